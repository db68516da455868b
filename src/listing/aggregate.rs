use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::listing::{parse_lease_years, parse_storey_range, FilterSpec, TransactionRecord};

/// Filtered statistics for one town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownAggregate {
    /// Mean resale price rounded half up; `None` when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_price: Option<u64>,
    #[serde(rename = "listingsCount")]
    pub listing_count: usize,
    /// Matching records in input order.
    pub matching_listings: Vec<TransactionRecord>,
}

impl TownAggregate {
    fn from_matches(matching_listings: Vec<TransactionRecord>, total_price: u64) -> Self {
        let listing_count = matching_listings.len();
        Self {
            average_price: rounded_mean(total_price, listing_count),
            listing_count,
            matching_listings,
        }
    }
}

/// `round(total / count)` with halves rounded up, or `None` for no items.
pub fn rounded_mean(total: u64, count: usize) -> Option<u64> {
    let count = u64::try_from(count).ok().filter(|&n| n > 0)?;
    Some(total.saturating_add(count / 2) / count)
}

/// Parse a resale price, truncating any fractional part. Negative and
/// non-numeric prices are rejected.
pub fn parse_price(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(price) = text.parse::<u64>() {
        return Some(price);
    }
    text.parse::<f64>().ok()
        .filter(|price| price.is_finite() && *price >= 0.0 && *price < u64::MAX as f64)
        .map(|price| price.trunc() as u64)
}

/// Parse a floor area in square metres.
pub fn parse_floor_area(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|area| area.is_finite() && *area >= 0.0)
}

/// Outcome of testing one record against the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Included { price: u64 },
    Excluded,
    Invalid,
}

fn evaluate(index: usize, record: &TransactionRecord, filters: &FilterSpec) -> Verdict {
    let Some(price) = parse_price(&record.resale_price) else {
        warn!(record = index, town = %record.town, price = %record.resale_price, "non-numeric resale price; record excluded");
        return Verdict::Invalid;
    };
    let Some(area) = parse_floor_area(&record.floor_area_sqm) else {
        warn!(record = index, town = %record.town, area = %record.floor_area_sqm, "non-numeric floor area; record excluded");
        return Verdict::Invalid;
    };

    let meets_type = filters.matches_flat_type(&record.flat_type);
    let meets_lease = filters.matches_lease(parse_lease_years(&record.remaining_lease));
    let meets_floor_area = filters.floor_area_range.contains(area);
    let meets_storey = parse_storey_range(&record.storey_range)
        .overlaps(filters.min_storey, filters.max_storey);

    if meets_type && meets_lease && meets_floor_area && meets_storey {
        Verdict::Included { price }
    } else {
        Verdict::Excluded
    }
}

/// Filter `records` and compute per-town count and mean price.
///
/// Towns are keyed by `record.town` exactly as supplied. Towns with no
/// matching record are omitted from the result.
pub fn aggregate(records: &[TransactionRecord], filters: &FilterSpec) -> BTreeMap<String, TownAggregate> {
    let mut matches: BTreeMap<&str, (Vec<TransactionRecord>, u64)> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        if let Verdict::Included { price } = evaluate(index, record, filters) {
            let (listings, total) = matches.entry(record.town.as_str()).or_default();
            listings.push(record.clone());
            *total = total.saturating_add(price);
        }
    }

    matches.into_iter()
        .map(|(town, (listings, total))| (town.to_string(), TownAggregate::from_matches(listings, total)))
        .collect()
}

/// True if `record` passes every filter predicate and has numeric fields.
pub fn record_matches(record: &TransactionRecord, filters: &FilterSpec) -> bool {
    matches!(evaluate(0, record, filters), Verdict::Included { .. })
}
