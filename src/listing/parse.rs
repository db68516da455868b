//! Parsers for the semi-structured text fields of a resale record.

use std::sync::OnceLock;

use regex::Regex;

use crate::listing::FloorAreaBucket;

/// Storey range assumed when a record's storey text cannot be parsed.
pub const FULL_STOREY_RANGE: StoreyRange = StoreyRange { min: 1, max: 50 };

fn lease_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\s+years").unwrap_or_else(|e| unreachable!("{e}")))
}

fn storey_span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\s+TO\s+(\d+)").unwrap_or_else(|e| unreachable!("{e}")))
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").unwrap_or_else(|e| unreachable!("{e}")))
}

/// Whole years of remaining lease: the first integer followed by "years".
/// Returns 0 when there is none.
pub fn parse_lease_years(text: &str) -> u32 {
    lease_pattern().captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Inclusive storey span of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreyRange {
    pub min: u32,
    pub max: u32,
}

impl StoreyRange {
    #[inline]
    pub fn new(min: u32, max: u32) -> Self { Self { min, max } }

    /// True if the span shares at least one storey with `[min, max]`.
    #[inline]
    pub fn overlaps(&self, min: u32, max: u32) -> bool {
        self.max >= min && self.min <= max
    }
}

impl Default for StoreyRange {
    fn default() -> Self { FULL_STOREY_RANGE }
}

/// Parse `"<a> TO <b>"`, else a lone integer for both bounds, else the full
/// range so the record is never excluded by storey.
pub fn parse_storey_range(text: &str) -> StoreyRange {
    if let Some(caps) = storey_span_pattern().captures(text) {
        if let (Ok(min), Ok(max)) = (caps[1].parse(), caps[2].parse()) {
            return StoreyRange { min, max };
        }
    }
    integer_pattern().find(text)
        .and_then(|m| m.as_str().parse().ok())
        .map(|storey| StoreyRange { min: storey, max: storey })
        .unwrap_or(FULL_STOREY_RANGE)
}

/// Whether `area` falls in the bucket tagged `bucket`. Unknown tags match
/// everything.
pub fn matches_floor_area_bucket(area: f64, bucket: &str) -> bool {
    FloorAreaBucket::from_tag(bucket).contains(area)
}
