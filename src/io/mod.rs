//! File and network IO for the merge and aggregation pipeline.
//!
//! - `geojson` - raw subzone and merged area FeatureCollections
//! - `records` - resale records from JSON (bare or `datastore_search`) and CSV
//! - `fetch` - paginated download from data.gov.sg (requires `download` feature)
//! - `write` - atomic JSON output

mod geojson;
mod records;
mod write;

#[cfg(feature = "download")]
pub mod fetch;

pub use geojson::{read_json_file, read_merged, read_subzones};
pub use records::{read_records, read_records_csv, records_from_json};
pub use write::write_json_file;
