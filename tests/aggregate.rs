// Integration tests for filtered per-town aggregation:
//   the two-record BEDOK set under type, floor-area and lease filters,
//   storey overlap, and JSON record/filter decoding.

use hdbmap::{
    aggregate, io::records_from_json, FilterSpec, FloorAreaBucket, TransactionRecord,
};
use serde_json::json;

fn bedok() -> Vec<TransactionRecord> {
    records_from_json(&json!([
        {
            "town": "BEDOK", "flat_type": "4 ROOM", "remaining_lease": "70 years",
            "resale_price": "450000", "floor_area_sqm": "90", "storey_range": "04 TO 06",
        },
        {
            "town": "BEDOK", "flat_type": "3 ROOM", "remaining_lease": "60 years",
            "resale_price": "350000", "floor_area_sqm": "65", "storey_range": "10 TO 12",
        },
    ])).unwrap()
}

#[test]
fn reset_filters_average_every_record() {
    let towns = aggregate(&bedok(), &FilterSpec::default());
    let stats = &towns["BEDOK"];
    assert_eq!(stats.average_price, Some(400_000));
    assert_eq!(stats.listing_count, 2);
    assert_eq!(stats.matching_listings, bedok());
}

#[test]
fn flat_type_filter() {
    let filters = FilterSpec { flat_type: "3 ROOM".into(), ..FilterSpec::default() };
    let towns = aggregate(&bedok(), &filters);
    assert_eq!(towns["BEDOK"].average_price, Some(350_000));
    assert_eq!(towns["BEDOK"].listing_count, 1);
}

#[test]
fn floor_area_filter_removes_town() {
    let filters = FilterSpec { floor_area_range: FloorAreaBucket::Below60, ..FilterSpec::default() };
    assert!(aggregate(&bedok(), &filters).get("BEDOK").is_none());
}

#[test]
fn single_year_lease_window_is_exact() {
    let exact = |years| FilterSpec { min_lease_years: years, max_lease_years: years, ..FilterSpec::default() };

    assert_eq!(aggregate(&bedok(), &exact(70))["BEDOK"].average_price, Some(450_000));
    assert_eq!(aggregate(&bedok(), &exact(60))["BEDOK"].average_price, Some(350_000));
    assert!(aggregate(&bedok(), &exact(65)).is_empty());
}

#[test]
fn storey_filter_uses_overlap() {
    let storeys = |min, max| FilterSpec { min_storey: min, max_storey: max, ..FilterSpec::default() };

    let towns = aggregate(&bedok(), &storeys(11, 11));
    assert_eq!(towns["BEDOK"].listing_count, 1);
    assert_eq!(towns["BEDOK"].matching_listings[0].storey_range, "10 TO 12");

    assert!(aggregate(&bedok(), &storeys(13, 20)).is_empty());
}

#[test]
fn non_numeric_price_is_excluded_not_fatal() {
    let mut records = bedok();
    records.push(TransactionRecord::new("BEDOK", "4 ROOM", "70 years", "n/a", "90", "04 TO 06"));

    let towns = aggregate(&records, &FilterSpec::default());
    assert_eq!(towns["BEDOK"].listing_count, 2);
}

#[test]
fn towns_are_matched_case_sensitively() {
    let mut records = bedok();
    records.push(TransactionRecord::new("Bedok", "4 ROOM", "70 years", "500000", "90", "04 TO 06"));

    let towns = aggregate(&records, &FilterSpec::default());
    assert_eq!(towns["BEDOK"].listing_count, 2);
    assert_eq!(towns["Bedok"].listing_count, 1);
}

#[test]
fn filters_decode_from_camel_case_json() {
    let filters: FilterSpec = serde_json::from_value(json!({
        "flatType": "3 ROOM",
        "floorAreaRange": "60_79",
        "minStorey": 10,
    })).unwrap();
    assert_eq!(filters.flat_type, "3 ROOM");
    assert_eq!(filters.floor_area_range, FloorAreaBucket::From60To79);
    assert_eq!(filters.min_storey, 10);
    assert_eq!(filters.max_lease_years, 99);

    let towns = aggregate(&bedok(), &filters);
    assert_eq!(towns["BEDOK"].average_price, Some(350_000));
}

#[test]
fn datastore_response_records_decode() {
    let records = records_from_json(&json!({
        "success": true,
        "result": {
            "records": [{
                "_id": 7, "month": "2024-01", "town": "BEDOK", "flat_type": "4 ROOM",
                "block": "101", "street_name": "BEDOK NTH AVE 4", "storey_range": "04 TO 06",
                "floor_area_sqm": 90, "flat_model": "Improved", "lease_commence_date": 1978,
                "remaining_lease": "53 years 04 months", "resale_price": 450000,
            }],
        },
    })).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resale_price, "450000");
    assert_eq!(records[0].floor_area_sqm, "90");
    assert_eq!(records[0].lease_commence_date.as_deref(), Some("1978"));

    let filters = FilterSpec { min_lease_years: 53, max_lease_years: 53, ..FilterSpec::default() };
    assert_eq!(aggregate(&records, &filters)["BEDOK"].listing_count, 1);
}
