//! Loading resale transaction records.

use std::{fs::File, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::io::read_json_file;
use crate::listing::TransactionRecord;

/// Decode records from either a bare JSON array or a data.gov.sg
/// `datastore_search` response. Elements that do not decode as a record are
/// skipped with a warning; only a wrongly shaped document is an error.
pub fn records_from_json(value: &Value) -> Result<Vec<TransactionRecord>> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(object) => {
            if let Some(success) = object.get("success").and_then(Value::as_bool) {
                ensure!(success, "[io::records] Upstream response reports failure");
            }
            object.get("result")
                .and_then(|result| result.get("records"))
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("[io::records] Response has no result.records array"))?
        }
        _ => bail!("[io::records] Expected an array of records or a datastore_search response"),
    };

    Ok(records.iter().enumerate().filter_map(|(index, record)| {
        TransactionRecord::deserialize(record)
            .inspect_err(|error| warn!(record = index, %error, "undecodable transaction record; skipped"))
            .ok()
    }).collect())
}

/// Read records from a CSV file, every column as a string.
pub fn read_records_csv(path: &Path) -> Result<Vec<TransactionRecord>> {
    let file = File::open(path)
        .with_context(|| format!("[io::records] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::records] Failed to read CSV from {}", path.display()))?;
    records_from_frame(&df)
}

/// Read records from `.csv` or JSON, chosen by file extension.
pub fn read_records(path: &Path) -> Result<Vec<TransactionRecord>> {
    let is_csv = path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_records_csv(path)
    } else {
        let value = read_json_file(path)?;
        records_from_json(&value)
            .with_context(|| format!("[io::records] Failed to load records from {}", path.display()))
    }
}

/// Cells of a string column, or `None` if the column is absent.
fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<Option<Vec<Option<&'a str>>>> {
    let Ok(column) = df.column(name) else { return Ok(None) };
    let cells = column.str()
        .with_context(|| format!("[io::records] Column {name} is not a string column"))?
        .into_iter()
        .collect();
    Ok(Some(cells))
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>> {
    string_column(df, name)?
        .ok_or_else(|| anyhow!("[io::records] CSV is missing required column {name:?}"))
}

/// Convert an all-string frame into records. Null cells become empty strings
/// in required columns and `None` in optional ones.
fn records_from_frame(df: &DataFrame) -> Result<Vec<TransactionRecord>> {
    let town = required_column(df, "town")?;
    let flat_type = required_column(df, "flat_type")?;
    let remaining_lease = required_column(df, "remaining_lease")?;
    let resale_price = required_column(df, "resale_price")?;
    let floor_area_sqm = required_column(df, "floor_area_sqm")?;
    let storey_range = required_column(df, "storey_range")?;

    let month = string_column(df, "month")?;
    let block = string_column(df, "block")?;
    let street_name = string_column(df, "street_name")?;
    let flat_model = string_column(df, "flat_model")?;
    let lease_commence_date = string_column(df, "lease_commence_date")?;

    let text = |cells: &[Option<&str>], row: usize| cells[row].unwrap_or_default().to_string();
    let optional = |cells: &Option<Vec<Option<&str>>>, row: usize| {
        cells.as_ref().and_then(|cells| cells[row]).map(str::to_string)
    };

    Ok((0..df.height()).map(|row| TransactionRecord {
        town: text(&town, row),
        flat_type: text(&flat_type, row),
        remaining_lease: text(&remaining_lease, row),
        resale_price: text(&resale_price, row),
        floor_area_sqm: text(&floor_area_sqm, row),
        storey_range: text(&storey_range, row),
        month: optional(&month, row),
        block: optional(&block, row),
        street_name: optional(&street_name, row),
        flat_model: optional(&flat_model, row),
        lease_commence_date: optional(&lease_commence_date, row),
    }).collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn bedok() -> Value {
        json!({
            "town": "BEDOK",
            "flat_type": "4 ROOM",
            "remaining_lease": "70 years",
            "resale_price": "450000",
            "floor_area_sqm": "90",
            "storey_range": "04 TO 06",
        })
    }

    #[test]
    fn bare_array() {
        let records = records_from_json(&json!([bedok(), bedok()])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].town, "BEDOK");
    }

    #[test]
    fn datastore_response() {
        let records = records_from_json(&json!({
            "success": true,
            "result": { "resource_id": "x", "records": [bedok()], "total": 1 },
        })).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn failed_response_is_an_error() {
        assert!(records_from_json(&json!({ "success": false, "result": { "records": [] } })).is_err());
        assert!(records_from_json(&json!({ "success": true })).is_err());
        assert!(records_from_json(&json!("records")).is_err());
    }

    #[test]
    fn undecodable_record_is_skipped() {
        let mut null_price = bedok();
        null_price["resale_price"] = Value::Null;
        let mut no_town = bedok();
        no_town.as_object_mut().unwrap().remove("town");

        let records = records_from_json(&json!([bedok(), null_price, true, no_town])).unwrap();
        assert_eq!(records, vec![serde_json::from_value::<TransactionRecord>(bedok()).unwrap()]);

        let response = records_from_json(&json!({
            "success": true,
            "result": { "records": [{ "town": "BEDOK", "resale_price": false }, bedok()] },
        })).unwrap();
        assert_eq!(response.len(), 1);
    }

    #[test]
    fn csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "month,town,flat_type,block,street_name,storey_range,floor_area_sqm,flat_model,lease_commence_date,remaining_lease,resale_price").unwrap();
        writeln!(file, "2024-01,ANG MO KIO,2 ROOM,406,ANG MO KIO AVE 10,01 TO 03,44,Improved,1979,54 years 04 months,267000").unwrap();
        writeln!(file, "2024-01,BEDOK,4 ROOM,101,BEDOK NTH,10 TO 12,90.0,Model A,1990,65 years,450000").unwrap();
        file.flush().unwrap();

        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].town, "ANG MO KIO");
        assert_eq!(records[0].storey_range, "01 TO 03");
        assert_eq!(records[0].lease_commence_date.as_deref(), Some("1979"));
        assert_eq!(records[1].floor_area_sqm, "90.0");
        assert_eq!(records[1].flat_model.as_deref(), Some("Model A"));
    }

    #[test]
    fn csv_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "town,flat_type").unwrap();
        writeln!(file, "BEDOK,4 ROOM").unwrap();
        file.flush().unwrap();
        assert!(read_records_csv(file.path()).is_err());
    }
}
