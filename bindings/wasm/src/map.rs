use anyhow::{anyhow, Result};
use hdbmap_core::{
    geom::{merge_subzones, read_features, MergeSkip},
    FilterSpec, MergeLevel, MergedCollection, TownTable, TransactionRecord,
};
use serde_json::{json, Value};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};

use crate::common::*;

/// Merged town polygons held in WASM memory, ready to be recoloured as the
/// filter bar changes.
#[wasm_bindgen]
pub struct WasmTownMap {
    inner: MergedCollection,
    skipped: Vec<MergeSkip>,
}

fn skip_rows(skipped: &[MergeSkip]) -> Vec<Value> {
    skipped.iter().map(|skip| json!({
        "group": skip.group(),
        "member": skip.member(),
        "reason": skip.to_string(),
    })).collect()
}

fn parse_level(level: Option<String>) -> Result<Option<MergeLevel>> {
    match level.as_deref() {
        None | Some("merged") => Ok(None),
        Some(s) => MergeLevel::from_str(s)
            .map(Some)
            .ok_or_else(|| anyhow!("Unknown level {s:?}. Expected one of: merged, planning-area, town")),
    }
}

#[wasm_bindgen]
impl WasmTownMap {
    /// Build from a GeoJSON FeatureCollection.
    /// level: "town" / "planning-area" merges raw subzones (built-in town
    /// table); "merged" or omitted loads an already merged collection.
    #[wasm_bindgen(constructor)]
    pub fn new(collection: JsValue, level: Option<String>) -> Result<WasmTownMap, JsValue> {
        let value = js_to_json(&collection).map_err(js_err)?;
        let (inner, skipped) = match parse_level(level).map_err(js_err)? {
            None => (MergedCollection::from_geojson(&value).map_err(js_err)?, Vec::new()),
            Some(level) => {
                let features = read_features(&value).map_err(js_err)?;
                let report = merge_subzones(&features, &TownTable::singapore(), level);
                (report.areas, report.skipped)
            }
        };
        Ok(WasmTownMap { inner, skipped })
    }

    /// Number of merged features.
    pub fn len(&self) -> usize { self.inner.len() }

    /// Names of the merged features, in id order.
    pub fn names(&self) -> Result<JsValue, JsValue> {
        let names: Vec<&str> = self.inner.iter().map(|area| area.name.as_str()).collect();
        to_js(&names).map_err(js_err)
    }

    /// Members and groups left out of the merge:
    /// `[{ group, member, reason }]`, `member` null for a dropped group.
    pub fn skipped(&self) -> Result<JsValue, JsValue> {
        to_js(&skip_rows(&self.skipped)).map_err(js_err)
    }

    /// Merged areas as a GeoJSON FeatureCollection (JS object).
    #[wasm_bindgen(js_name = "to_geojson")]
    pub fn to_geojson(&self) -> Result<JsValue, JsValue> {
        json_to_js(&self.inner.to_geojson()).map_err(js_err)
    }

    /// Aggregate `records` under `filters` (camelCase filter object, missing
    /// fields take their reset values) and return the joined price layer.
    #[wasm_bindgen(js_name = "price_layer")]
    pub fn price_layer(&self, records: JsValue, filters: JsValue) -> Result<JsValue, JsValue> {
        let records: Vec<TransactionRecord> = serde_wasm_bindgen::from_value(records).map_err(js_err)?;
        let filters: FilterSpec = js_to_typed(filters).map_err(js_err)?;
        json_to_js(&hdbmap_core::price_layer(&self.inner, &records, &filters)).map_err(js_err)
    }
}

/// Unfiltered dataset overview used to populate filter controls.
#[wasm_bindgen]
pub fn summarize(records: JsValue) -> Result<JsValue, JsValue> {
    let records: Vec<TransactionRecord> = serde_wasm_bindgen::from_value(records).map_err(js_err)?;
    to_js(&hdbmap_core::summarize(&records)).map_err(js_err)
}
