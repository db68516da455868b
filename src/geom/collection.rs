use anyhow::{anyhow, bail, ensure, Context, Result};
use serde_json::{json, Map, Value};

use crate::geom::{GeometryFeature, Shape};

/// One unioned town or planning-area feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedArea {
    /// Unique within one merge run; the rendering layer's feature-state key.
    pub id: u32,
    pub name: String,
    pub town_name: Option<String>,
    /// Member names folded into `geometry`, in grouping order.
    pub original_subzones: Vec<String>,
    pub geometry: Shape,
}

impl MergedArea {
    /// Key used to look up aggregates: the town if known, otherwise the name.
    #[inline]
    pub fn join_key(&self) -> &str {
        self.town_name.as_deref().unwrap_or(&self.name)
    }

    /// Base property bag: `{Name, HDBTownName, originalSubzones, id}`.
    pub fn properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("Name".into(), json!(self.name));
        properties.insert("HDBTownName".into(), json!(self.town_name));
        properties.insert("originalSubzones".into(), json!(self.original_subzones));
        properties.insert("id".into(), json!(self.id));
        properties
    }

    /// Render as a GeoJSON Feature with the given properties.
    pub(crate) fn to_feature(&self, properties: Map<String, Value>) -> Value {
        json!({
            "type": "Feature",
            "id": self.id, // Feature ID for MapLibre feature-state
            "geometry": self.geometry.to_geojson(),
            "properties": properties,
        })
    }

    fn from_feature(feature: &Value) -> Result<Self> {
        let properties = feature["properties"].as_object()
            .ok_or_else(|| anyhow!("[geom::collection] Feature has no properties object"))?;

        let name = properties.get("Name").and_then(Value::as_str)
            .ok_or_else(|| anyhow!("[geom::collection] Feature has no Name"))?
            .to_string();
        let town_name = properties.get("HDBTownName").and_then(Value::as_str).map(str::to_string);
        let original_subzones = properties.get("originalSubzones").and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let id = feature.get("id").or_else(|| properties.get("id"))
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| anyhow!("[geom::collection] Feature {name:?} has no integer id"))?;
        let geometry = Shape::from_geojson(&feature["geometry"])
            .with_context(|| format!("[geom::collection] Feature {name:?} has no polygon geometry"))?;

        Ok(Self { id, name, town_name, original_subzones, geometry })
    }
}

/// Output of one merge run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedCollection {
    pub features: Vec<MergedArea>,
}

impl MergedCollection {
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, MergedArea> { self.features.iter() }

    #[inline] pub(crate) fn push(&mut self, area: MergedArea) { self.features.push(area) }

    /// Find a feature by name.
    pub fn get(&self, name: &str) -> Option<&MergedArea> {
        self.features.iter().find(|area| area.name == name)
    }

    /// Export as a GeoJSON FeatureCollection.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter()
                .map(|area| area.to_feature(area.properties()))
                .collect::<Vec<_>>(),
        })
    }

    /// Read back a collection written by [`MergedCollection::to_geojson`].
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let features = feature_array(value)?.iter()
            .map(MergedArea::from_feature)
            .collect::<Result<Vec<_>>>()?;

        let mut ids: Vec<u32> = features.iter().map(|area| area.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ensure!(ids.len() == features.len(), "[geom::collection] Feature ids are not unique");

        Ok(Self { features })
    }
}

impl<'a> IntoIterator for &'a MergedCollection {
    type Item = &'a MergedArea;
    type IntoIter = std::slice::Iter<'a, MergedArea>;

    fn into_iter(self) -> Self::IntoIter { self.features.iter() }
}

/// The `features` array of a FeatureCollection, or an error if the value is
/// not one.
fn feature_array(value: &Value) -> Result<&Vec<Value>> {
    let Some(object) = value.as_object() else {
        bail!("[geom::collection] Input is not a JSON object");
    };
    if let Some(ty) = object.get("type").and_then(Value::as_str) {
        ensure!(ty == "FeatureCollection", "[geom::collection] Expected a FeatureCollection, found {ty:?}");
    }
    object.get("features").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[geom::collection] FeatureCollection has no features array"))
}

/// Parse a raw FeatureCollection into per-feature geometry and properties.
/// Only a structurally invalid collection is an error.
pub fn read_features(value: &Value) -> Result<Vec<GeometryFeature>> {
    feature_array(value)?.iter()
        .enumerate()
        .map(|(i, feature)| GeometryFeature::from_geojson(feature)
            .with_context(|| format!("[geom::collection] Invalid feature at index {i}")))
        .collect()
}
