mod collection;
mod merge;
mod shape;
mod union;

pub use collection::{read_features, MergedArea, MergedCollection};
pub use merge::{
    merge_planning_areas_to_towns, merge_subzones, merge_subzones_to_planning_areas, merge_subzones_to_towns,
    GroupKey, MergeLevel, MergeMember, MergeReport, MergeSkip, Merger,
};
pub use shape::{GeometryFeature, GeometryIssue, Shape};
pub use union::{BooleanUnion, PolygonUnion, UnionError};
