use std::{fs, path::Path};

use ahash::AHashMap;
use anyhow::{Context, Result};
use serde_json::Value;

/// Planning areas (URA Master Plan 2019) and the HDB town each one is
/// aggregated into. An empty town means the area has no HDB resale town.
const SINGAPORE_PLANNING_AREAS: &[(&str, &str)] = &[
    ("ANG MO KIO", "ANG MO KIO"),
    ("BEDOK", "BEDOK"),
    ("BISHAN", "BISHAN"),
    ("BOON LAY", "JURONG WEST"),
    ("BUKIT BATOK", "BUKIT BATOK"),
    ("BUKIT MERAH", "BUKIT MERAH"),
    ("BUKIT PANJANG", "BUKIT PANJANG"),
    ("BUKIT TIMAH", "BUKIT TIMAH"),
    ("CENTRAL WATER CATCHMENT", ""),
    ("CHANGI", ""),
    ("CHANGI BAY", ""),
    ("CHOA CHU KANG", "CHOA CHU KANG"),
    ("CLEMENTI", "CLEMENTI"),
    ("DOWNTOWN CORE", "CENTRAL AREA"),
    ("GEYLANG", "GEYLANG"),
    ("HOUGANG", "HOUGANG"),
    ("JURONG EAST", "JURONG EAST"),
    ("JURONG WEST", "JURONG WEST"),
    ("KALLANG", "KALLANG/WHAMPOA"),
    ("LIM CHU KANG", ""),
    ("MANDAI", ""),
    ("MARINA EAST", ""),
    ("MARINA SOUTH", ""),
    ("MARINE PARADE", "MARINE PARADE"),
    ("MUSEUM", "CENTRAL AREA"),
    ("NEWTON", "CENTRAL AREA"),
    ("NORTH-EASTERN ISLANDS", ""),
    ("NOVENA", "KALLANG/WHAMPOA"),
    ("ORCHARD", "CENTRAL AREA"),
    ("OUTRAM", "CENTRAL AREA"),
    ("PASIR RIS", "PASIR RIS"),
    ("PAYA LEBAR", ""),
    ("PIONEER", ""),
    ("PUNGGOL", "PUNGGOL"),
    ("QUEENSTOWN", "QUEENSTOWN"),
    ("RIVER VALLEY", "CENTRAL AREA"),
    ("ROCHOR", "CENTRAL AREA"),
    ("SELETAR", ""),
    ("SEMBAWANG", "SEMBAWANG"),
    ("SENGKANG", "SENGKANG"),
    ("SERANGOON", "SERANGOON"),
    ("SIMPANG", ""),
    ("SINGAPORE RIVER", "CENTRAL AREA"),
    ("SOUTHERN ISLANDS", ""),
    ("STRAITS VIEW", ""),
    ("SUNGEI KADUT", ""),
    ("TAMPINES", "TAMPINES"),
    ("TANGLIN", ""),
    ("TENGAH", "TENGAH"),
    ("TOA PAYOH", "TOA PAYOH"),
    ("TUAS", ""),
    ("WESTERN ISLANDS", ""),
    ("WESTERN WATER CATCHMENT", ""),
    ("WOODLANDS", "WOODLANDS"),
    ("YISHUN", "YISHUN"),
];

/// Static lookup from planning-area name to the containing HDB town.
#[derive(Debug, Clone, Default)]
pub struct TownTable {
    towns: AHashMap<String, String>,
}

impl TownTable {
    /// Build a table from `(planning area, town)` pairs. Keys are upper-cased;
    /// empty towns are kept so they read back as "no town".
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            towns: entries.into_iter()
                .map(|(area, town)| (area.as_ref().trim().to_uppercase(), town.into()))
                .collect(),
        }
    }

    /// The built-in Singapore planning-area to HDB-town table.
    pub fn singapore() -> Self {
        Self::new(SINGAPORE_PLANNING_AREAS.iter().copied())
    }

    /// Parse a JSON object of `{"AREA": "TOWN" | "" | null}`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object()
            .context("[area::town] Town table must be a JSON object")?;

        let mut entries = Vec::with_capacity(object.len());
        for (area, town) in object {
            let town = match town {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => anyhow::bail!("[area::town] Town for {area:?} must be a string or null, got {other}"),
            };
            entries.push((area.as_str(), town));
        }
        Ok(Self::new(entries))
    }

    /// Read a town table override from a JSON file.
    pub fn read_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[area::town] Failed to read town table {}", path.display()))?;
        let value: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("[area::town] Failed to parse town table {}", path.display()))?;
        Self::from_json(&value)
    }

    /// Town containing `planning_area`. Absent and empty entries both yield `None`.
    pub fn town_of(&self, planning_area: &str) -> Option<&str> {
        self.towns.get(planning_area)
            .map(|town| town.trim())
            .filter(|town| !town.is_empty())
    }

    #[inline] pub fn len(&self) -> usize { self.towns.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.towns.is_empty() }
}
