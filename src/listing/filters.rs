use serde::{Deserialize, Serialize};
use tracing::warn;

/// Flat-type sentinel that matches every record.
pub const ALL_FLAT_TYPES: &str = "ALL";

/// Flat types offered by the filter bar, `ALL` first.
pub const FLAT_TYPES: [&str; 8] = [
    ALL_FLAT_TYPES, "1 ROOM", "2 ROOM", "3 ROOM", "4 ROOM", "5 ROOM", "EXECUTIVE", "MULTI-GENERATION",
];

/// Floor-area band in square metres, identified by its tag (`"60_79"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FloorAreaBucket {
    #[default]
    Any,
    Below60,
    From60To79,
    From80To99,
    From100To119,
    From120Plus,
}

impl FloorAreaBucket {
    pub const ALL: [FloorAreaBucket; 6] = [
        FloorAreaBucket::Any,
        FloorAreaBucket::Below60,
        FloorAreaBucket::From60To79,
        FloorAreaBucket::From80To99,
        FloorAreaBucket::From100To119,
        FloorAreaBucket::From120Plus,
    ];

    /// Parse a bucket tag, or `None` if it is not one of the known tags.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        FloorAreaBucket::ALL.into_iter().find(|bucket| bucket.tag() == tag)
    }

    /// Parse a bucket tag. Unknown tags fall back to `Any` silently.
    pub fn from_tag(tag: &str) -> Self {
        Self::parse_tag(tag).unwrap_or_default()
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FloorAreaBucket::Any => "ANY",
            FloorAreaBucket::Below60 => "BELOW_60",
            FloorAreaBucket::From60To79 => "60_79",
            FloorAreaBucket::From80To99 => "80_99",
            FloorAreaBucket::From100To119 => "100_119",
            FloorAreaBucket::From120Plus => "120_PLUS",
        }
    }

    /// Human-readable label for a filter control.
    pub fn label(&self) -> &'static str {
        match self {
            FloorAreaBucket::Any => "Any",
            FloorAreaBucket::Below60 => "Below 60 m²",
            FloorAreaBucket::From60To79 => "60-79 m²",
            FloorAreaBucket::From80To99 => "80-99 m²",
            FloorAreaBucket::From100To119 => "100-119 m²",
            FloorAreaBucket::From120Plus => "120 m² and above",
        }
    }

    /// Bounds are inclusive on both ends of the closed bands.
    pub fn contains(&self, area: f64) -> bool {
        match self {
            FloorAreaBucket::Any => true,
            FloorAreaBucket::Below60 => area < 60.0,
            FloorAreaBucket::From60To79 => (60.0..=79.0).contains(&area),
            FloorAreaBucket::From80To99 => (80.0..=99.0).contains(&area),
            FloorAreaBucket::From100To119 => (100.0..=119.0).contains(&area),
            FloorAreaBucket::From120Plus => area >= 120.0,
        }
    }
}

/// Decoding path for filter input; an unknown tag is reported once here.
impl From<String> for FloorAreaBucket {
    fn from(tag: String) -> Self {
        Self::parse_tag(&tag).unwrap_or_else(|| {
            warn!(bucket = %tag, "unknown floor area bucket; matching any area");
            FloorAreaBucket::Any
        })
    }
}

impl From<FloorAreaBucket> for &'static str {
    fn from(bucket: FloorAreaBucket) -> Self { bucket.tag() }
}

/// Filter-bar state applied by the aggregator. Bounds are inclusive; an
/// inverted range simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub flat_type: String,
    pub min_lease_years: u32,
    pub max_lease_years: u32,
    pub floor_area_range: FloorAreaBucket,
    pub min_storey: u32,
    pub max_storey: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            flat_type: ALL_FLAT_TYPES.to_string(),
            min_lease_years: 0,
            max_lease_years: 99,
            floor_area_range: FloorAreaBucket::Any,
            min_storey: 1,
            max_storey: 50,
        }
    }
}

impl FilterSpec {
    #[inline]
    pub fn matches_flat_type(&self, flat_type: &str) -> bool {
        self.flat_type == ALL_FLAT_TYPES || self.flat_type == flat_type
    }

    #[inline]
    pub fn matches_lease(&self, years: u32) -> bool {
        self.min_lease_years <= years && years <= self.max_lease_years
    }
}
