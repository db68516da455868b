use ahash::AHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::area::{extract_planning_area, extract_subzone, TownTable};
use crate::geom::{
    BooleanUnion, GeometryFeature, GeometryIssue, MergedArea, MergedCollection, PolygonUnion, Shape, UnionError,
};

/// Target key of a merge group: the emitted `name` plus the town it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub name: String,
    pub town_name: Option<String>,
}

impl GroupKey {
    pub fn new(name: impl Into<String>, town_name: Option<impl Into<String>>) -> Self {
        Self { name: name.into(), town_name: town_name.map(Into::into) }
    }
}

/// One feature handed to the merger: the name recorded in `originalSubzones`
/// and the geometry to fold in.
#[derive(Debug, Clone)]
pub struct MergeMember<'a> {
    pub label: String,
    pub geometry: Result<&'a Shape, GeometryIssue>,
}

/// A member or group the merger left out, with the reason.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeSkip {
    /// Member had no usable Polygon/MultiPolygon geometry.
    #[error("{group}: dropped {member}: {issue}")]
    InvalidGeometry { group: String, member: String, issue: GeometryIssue },
    /// Folding the member into the accumulator failed; accumulator kept.
    #[error("{group}: skipped {member}: {error}")]
    UnionFailed { group: String, member: String, error: UnionError },
    /// No member of the group had usable geometry; nothing emitted.
    #[error("{group}: no usable member")]
    EmptyGroup { group: String },
}

impl MergeSkip {
    pub fn group(&self) -> &str {
        match self {
            MergeSkip::InvalidGeometry { group, .. }
            | MergeSkip::UnionFailed { group, .. }
            | MergeSkip::EmptyGroup { group } => group,
        }
    }

    /// The member left out, or `None` when the whole group was dropped.
    pub fn member(&self) -> Option<&str> {
        match self {
            MergeSkip::InvalidGeometry { member, .. } | MergeSkip::UnionFailed { member, .. } => Some(member),
            MergeSkip::EmptyGroup { .. } => None,
        }
    }
}

/// Merged features plus the diagnostics collected while folding.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub areas: MergedCollection,
    pub skipped: Vec<MergeSkip>,
}

/// Merge granularity for raw subzone input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeLevel {
    /// One feature per planning area; areas without a town are kept.
    PlanningArea,
    /// One feature per HDB town; areas without a town are excluded.
    #[default]
    Town,
}

impl MergeLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "planning-area" | "area" => Some(MergeLevel::PlanningArea),
            "town" => Some(MergeLevel::Town),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            MergeLevel::PlanningArea => "planning-area",
            MergeLevel::Town => "town",
        }
    }
}

/// Groups features by key and unions each group into a single feature.
#[derive(Debug, Clone, Default)]
pub struct Merger<U = BooleanUnion> {
    unioner: U,
}

impl Merger<BooleanUnion> {
    pub fn new() -> Self { Self::default() }
}

impl<U: PolygonUnion> Merger<U> {
    /// Merger with a custom pairwise union.
    pub fn with_union(unioner: U) -> Self { Self { unioner } }

    /// Merge `(key, member)` pairs. Groups come out in first-seen key order and
    /// get ids 1, 2, ... in that order. Failures never abort the run; they are
    /// logged and returned in `MergeReport::skipped`.
    pub fn merge<'a, I>(&self, members: I) -> MergeReport
    where
        I: IntoIterator<Item = (GroupKey, MergeMember<'a>)>,
    {
        // Group members in first-seen order of their key
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut groups: Vec<(GroupKey, Vec<MergeMember<'a>>)> = Vec::new();
        for (key, member) in members {
            match index.get(&key.name) {
                Some(&i) => groups[i].1.push(member),
                None => {
                    index.insert(key.name.clone(), groups.len());
                    groups.push((key, vec![member]));
                }
            }
        }

        let mut report = MergeReport::default();
        for (key, members) in groups {
            if let Some((shape, labels)) = self.merge_group(&key.name, members, &mut report.skipped) {
                let id = report.areas.len() as u32 + 1;
                report.areas.push(MergedArea {
                    id,
                    name: key.name,
                    town_name: key.town_name,
                    original_subzones: labels,
                    geometry: shape,
                });
            }
        }
        report
    }

    /// Fold one group left to right. Members the unioner rejects as operands
    /// are dropped before the seed is chosen. Returns `None` if no member was usable.
    fn merge_group(&self, group: &str, members: Vec<MergeMember<'_>>, skipped: &mut Vec<MergeSkip>) -> Option<(Shape, Vec<String>)> {
        let mut valid = Vec::with_capacity(members.len());
        for member in members {
            let checked = member.geometry.and_then(|shape| {
                let polygons = shape.to_multi_polygon();
                self.unioner.check(&polygons).map_err(GeometryIssue::Unusable)?;
                Ok((shape, polygons))
            });
            match checked {
                Ok((shape, polygons)) => valid.push((member.label, shape, polygons)),
                Err(issue) => {
                    warn!(group, member = %member.label, %issue, "dropping member without usable polygon geometry");
                    skipped.push(MergeSkip::InvalidGeometry { group: group.to_string(), member: member.label, issue });
                }
            }
        }

        let mut valid = valid.into_iter();
        let Some((first_label, first_shape, first_polygons)) = valid.next() else {
            warn!(group, "no member has valid geometry; dropping group");
            skipped.push(MergeSkip::EmptyGroup { group: group.to_string() });
            return None;
        };

        if valid.len() == 0 {
            return Some((first_shape.clone(), vec![first_label]));
        }

        let mut labels = vec![first_label];
        let mut acc = first_polygons;
        for (label, _, polygons) in valid {
            match self.unioner.union(&acc, &polygons) {
                Ok(merged) => {
                    acc = merged;
                    labels.push(label);
                }
                Err(error) => {
                    warn!(group, member = %label, %error, "union failed; skipping member");
                    skipped.push(MergeSkip::UnionFailed { group: group.to_string(), member: label, error });
                }
            }
        }

        // A successful union is never empty, and the seed passed the operand check.
        let shape = Shape::from_multi_polygon(acc).unwrap_or_else(|| first_shape.clone());
        Some((shape, labels))
    }
}

/// Label recorded for a subzone in `originalSubzones`.
fn subzone_label(descriptor: &str, planning_area: &str) -> String {
    extract_subzone(descriptor).unwrap_or_else(|| planning_area.to_string())
}

/// Key raw subzones by planning area, dropping those without one.
fn keyed_subzones<'a>(
    features: &'a [GeometryFeature],
    towns: &'a TownTable,
    level: MergeLevel,
) -> impl Iterator<Item = (GroupKey, MergeMember<'a>)> + 'a {
    features.iter().enumerate().filter_map(move |(i, feature)| {
        let Some(descriptor) = feature.descriptor() else {
            debug!(feature = i, "skipping feature without Description");
            return None;
        };
        let Some(planning_area) = extract_planning_area(descriptor) else {
            debug!(feature = i, "skipping feature without a planning area");
            return None;
        };
        let town = towns.town_of(&planning_area);

        let key = match level {
            MergeLevel::PlanningArea => GroupKey::new(planning_area.as_str(), town),
            MergeLevel::Town => match town {
                Some(town) => GroupKey::new(town, Some(town)),
                None => {
                    debug!(feature = i, %planning_area, "planning area has no HDB town; excluded");
                    return None;
                }
            },
        };

        let member = MergeMember {
            label: subzone_label(descriptor, &planning_area),
            geometry: feature.geometry.as_ref().map_err(Clone::clone),
        };
        Some((key, member))
    })
}

impl<U: PolygonUnion> Merger<U> {
    /// Key raw subzones by planning area or town and merge them.
    pub fn merge_subzones(&self, features: &[GeometryFeature], towns: &TownTable, level: MergeLevel) -> MergeReport {
        self.merge(keyed_subzones(features, towns, level))
    }
}

/// Merge raw subzones into one feature per planning area.
pub fn merge_subzones_to_planning_areas(features: &[GeometryFeature], towns: &TownTable) -> MergeReport {
    Merger::new().merge_subzones(features, towns, MergeLevel::PlanningArea)
}

/// Merge raw subzones directly into one feature per HDB town.
pub fn merge_subzones_to_towns(features: &[GeometryFeature], towns: &TownTable) -> MergeReport {
    Merger::new().merge_subzones(features, towns, MergeLevel::Town)
}

/// Merge raw subzones at the given level.
pub fn merge_subzones(features: &[GeometryFeature], towns: &TownTable, level: MergeLevel) -> MergeReport {
    Merger::new().merge_subzones(features, towns, level)
}

/// Second merge level: planning-area features into towns. Areas without a
/// town are excluded; `originalSubzones` lists the member planning areas.
pub fn merge_planning_areas_to_towns(areas: &MergedCollection) -> MergeReport {
    let members = areas.iter().filter_map(|area| {
        let town = area.town_name.as_deref()?;
        let member = MergeMember { label: area.name.clone(), geometry: Ok(&area.geometry) };
        Some((GroupKey::new(town, Some(town)), member))
    });
    Merger::new().merge(members)
}
