// Integration tests for file IO:
//   merged collection write/read, overwrite protection, CSV and JSON
//   record loading, and the town table override file.

use std::fs;

use hdbmap::{
    geom::merge_subzones,
    io::{read_merged, read_records, read_subzones, write_json_file},
    MergeLevel, TownTable,
};
use serde_json::json;
use tempfile::tempdir;

fn raw_subzones() -> serde_json::Value {
    let feature = |subzone: &str, area: &str, x: f64| json!({
        "type": "Feature",
        "properties": {
            "Description": format!("<th>SUBZONE_N</th> <td>{subzone}</td><th>PLN_AREA_N</th> <td>{area}</td>"),
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]],
        },
    });
    json!({
        "type": "FeatureCollection",
        "features": [feature("BEDOK NORTH", "BEDOK", 0.0), feature("BEDOK SOUTH", "BEDOK", 1.0)],
    })
}

#[test]
fn merged_areas_write_and_read_back() {
    let dir = tempdir().unwrap();
    let raw_path = dir.path().join("raw.geojson");
    let out_path = dir.path().join("out/towns.geojson");
    fs::write(&raw_path, raw_subzones().to_string()).unwrap();

    let features = read_subzones(&raw_path).unwrap();
    let merged = merge_subzones(&features, &TownTable::singapore(), MergeLevel::Town).areas;
    write_json_file(&out_path, &merged.to_geojson(), false).unwrap();

    let back = read_merged(&out_path).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back.features[0].name, "BEDOK");
    assert_eq!(back.features[0].original_subzones, vec!["BEDOK NORTH", "BEDOK SOUTH"]);
}

#[test]
fn existing_output_needs_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    fs::write(&path, "{}").unwrap();

    assert!(write_json_file(&path, &json!([1]), false).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

    write_json_file(&path, &json!([1]), true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");

    assert!(write_json_file(std::path::Path::new("-"), &json!([1]), true).is_err());
}

#[test]
fn records_load_from_csv_and_json() {
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("resale.csv");
    fs::write(&csv_path, "\
month,town,flat_type,block,street_name,storey_range,floor_area_sqm,flat_model,lease_commence_date,remaining_lease,resale_price
2024-01,BEDOK,4 ROOM,101,BEDOK NTH AVE 4,04 TO 06,90,Improved,1978,53 years 04 months,450000
2024-01,BEDOK,3 ROOM,102,BEDOK NTH AVE 4,10 TO 12,65,New Generation,1979,54 years,350000
").unwrap();
    let from_csv = read_records(&csv_path).unwrap();
    assert_eq!(from_csv.len(), 2);
    assert_eq!(from_csv[0].floor_area_sqm, "90");
    assert_eq!(from_csv[1].flat_model.as_deref(), Some("New Generation"));

    let json_path = dir.path().join("resale.json");
    fs::write(&json_path, serde_json::to_string(&from_csv).unwrap()).unwrap();
    assert_eq!(read_records(&json_path).unwrap(), from_csv);
}

#[test]
fn failed_datastore_response_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("response.json");
    fs::write(&path, json!({ "success": false, "error": { "message": "rate limited" } }).to_string()).unwrap();

    assert!(read_records(&path).is_err());
}

#[test]
fn town_table_override_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("towns.json");
    fs::write(&path, json!({ "bedok": "EAST", "changi": "", "tengah": null }).to_string()).unwrap();

    let towns = TownTable::read_json_file(&path).unwrap();
    assert_eq!(towns.town_of("BEDOK"), Some("EAST"));
    assert_eq!(towns.town_of("CHANGI"), None);
    assert_eq!(towns.town_of("TENGAH"), None);
    assert_eq!(towns.town_of("PUNGGOL"), None);

    fs::write(&path, json!({ "BEDOK": 3 }).to_string()).unwrap();
    assert!(TownTable::read_json_file(&path).is_err());
}
