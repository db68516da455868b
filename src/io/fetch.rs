//! Paginated download of resale records from the data.gov.sg datastore API.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::io::records_from_json;
use crate::listing::TransactionRecord;

pub const API_URL: &str = "https://data.gov.sg/api/action/datastore_search";

/// "Resale flat prices based on registration date from Jan-2017 onwards".
pub const DEFAULT_RESOURCE_ID: &str = "d_8b84c4ee58e3cfc0ece0d773c8ca6abc";

/// Records requested per page.
pub const PAGE_LIMIT: usize = 1000;

/// One decoded `datastore_search` page.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<TransactionRecord>,
    pub total: usize,
}

/// Decode one `datastore_search` response body.
pub fn decode_page(value: &Value) -> Result<Page> {
    let records = records_from_json(value)?;
    let total = value["result"]["total"].as_u64()
        .ok_or_else(|| anyhow!("[io::fetch] Response has no result.total"))?;
    Ok(Page { records, total: total as usize })
}

fn client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("hdbmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()
        .context("[io::fetch] Failed to build HTTP client")
}

/// Fetch every record of `resource_id`, page by page, until the reported
/// total is reached or a page comes back empty.
pub fn fetch_records(resource_id: &str) -> Result<Vec<TransactionRecord>> {
    let client = client()?;
    let mut records = Vec::new();
    let mut offset = 0;

    loop {
        let limit = PAGE_LIMIT.to_string();
        let offset_param = offset.to_string();
        debug!(resource_id, offset, "requesting page");

        let resp = client.get(API_URL)
            .query(&[("resource_id", resource_id), ("limit", limit.as_str()), ("offset", offset_param.as_str())])
            .send()
            .with_context(|| format!("[io::fetch] GET {API_URL} offset={offset}"))?
            .error_for_status()
            .with_context(|| format!("[io::fetch] GET {API_URL} offset={offset} returned error status"))?;
        let bytes = resp.bytes().context("[io::fetch] Failed to read response body")?;
        let value: Value = serde_json::from_slice(&bytes).context("[io::fetch] Response is not JSON")?;

        let page = decode_page(&value)?;
        let received = page.records.len();
        records.extend(page.records);
        offset += PAGE_LIMIT;

        if offset >= page.total || received == 0 {
            info!(resource_id, records = records.len(), total = page.total, "fetched resale records");
            return Ok(records);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_page_with_total() {
        let page = decode_page(&json!({
            "success": true,
            "result": {
                "resource_id": DEFAULT_RESOURCE_ID,
                "records": [{
                    "_id": 1,
                    "town": "BEDOK",
                    "flat_type": "4 ROOM",
                    "remaining_lease": "70 years",
                    "resale_price": "450000",
                    "floor_area_sqm": "90",
                    "storey_range": "04 TO 06",
                }],
                "total": 2500,
            },
        })).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total, 2500);
    }

    #[test]
    fn missing_total_is_an_error() {
        assert!(decode_page(&json!({ "success": true, "result": { "records": [] } })).is_err());
    }
}
