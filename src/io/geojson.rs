use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::geom::{read_features, GeometryFeature, MergedCollection};

/// Read and parse a JSON document from `path`.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("[io::geojson] Failed to parse JSON from {}", path.display()))
}

/// Read a raw subzone FeatureCollection.
pub fn read_subzones(path: &Path) -> Result<Vec<GeometryFeature>> {
    let value = read_json_file(path)?;
    read_features(&value)
        .with_context(|| format!("[io::geojson] {} is not a usable FeatureCollection", path.display()))
}

/// Read a merged town or planning-area collection written by `hdbmap merge`.
pub fn read_merged(path: &Path) -> Result<MergedCollection> {
    let value = read_json_file(path)?;
    MergedCollection::from_geojson(&value)
        .with_context(|| format!("[io::geojson] {} is not a merged area collection", path.display()))
}
