use std::collections::BTreeMap;

use serde::Serialize;

use crate::listing::{parse_lease_years, TransactionRecord};

/// Unfiltered overview of a record set, used to populate filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub record_count: usize,
    /// Distinct flat types in first-seen order.
    pub flat_types: Vec<String>,
    pub min_lease_years: u32,
    pub max_lease_years: u32,
    /// Unfiltered record count per town.
    pub town_counts: BTreeMap<String, usize>,
}

pub fn summarize(records: &[TransactionRecord]) -> DatasetSummary {
    let mut summary = DatasetSummary { record_count: records.len(), ..Default::default() };
    let mut lease_range: Option<(u32, u32)> = None;

    for record in records {
        if !summary.flat_types.iter().any(|ty| *ty == record.flat_type) {
            summary.flat_types.push(record.flat_type.clone());
        }

        let years = parse_lease_years(&record.remaining_lease);
        lease_range = Some(match lease_range {
            Some((lo, hi)) => (lo.min(years), hi.max(years)),
            None => (years, years),
        });

        *summary.town_counts.entry(record.town.clone()).or_default() += 1;
    }

    if let Some((lo, hi)) = lease_range {
        summary.min_lease_years = lo;
        summary.max_lease_years = hi;
    }
    summary
}
