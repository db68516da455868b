#![doc = "HDB resale map: planning-area polygon merging and per-town price aggregation"]
pub mod area;
pub mod geom;
pub mod io;
pub mod join;
pub mod listing;

#[doc(inline)]
pub use area::TownTable;

#[doc(inline)]
pub use geom::{GeometryFeature, MergeLevel, MergeReport, MergedArea, MergedCollection, Shape};

#[doc(inline)]
pub use listing::{aggregate, summarize, FilterSpec, FloorAreaBucket, TownAggregate, TransactionRecord};

#[doc(inline)]
pub use join::{join_aggregates, price_layer};
