use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One HDB resale transaction as published on data.gov.sg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub town: String,
    pub flat_type: String,
    /// e.g. "61 years 04 months"
    pub remaining_lease: String,
    #[serde(deserialize_with = "string_or_number")]
    pub resale_price: String,
    #[serde(deserialize_with = "string_or_number")]
    pub floor_area_sqm: String,
    /// e.g. "10 TO 12"
    pub storey_range: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_string_or_number")]
    pub lease_commence_date: Option<String>,
}

impl TransactionRecord {
    /// Record with only the fields the aggregator reads.
    pub fn new(
        town: impl Into<String>,
        flat_type: impl Into<String>,
        remaining_lease: impl Into<String>,
        resale_price: impl Into<String>,
        floor_area_sqm: impl Into<String>,
        storey_range: impl Into<String>,
    ) -> Self {
        Self {
            town: town.into(),
            flat_type: flat_type.into(),
            remaining_lease: remaining_lease.into(),
            resale_price: resale_price.into(),
            floor_area_sqm: floor_area_sqm.into(),
            storey_range: storey_range.into(),
            month: None,
            block: None,
            street_name: None,
            flat_model: None,
            lease_commence_date: None,
        }
    }
}

/// Accept `"450000"` and `450000` alike; numbers keep their JSON text form.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected a string or number, found {other}"))),
    }
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("expected a string or number, found {other}"))),
    }
}
