use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::geom::UnionError;

/// A polygonal GeoJSON geometry, kept in the type it was read as.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// Why a feature's geometry cannot take part in a merge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryIssue {
    #[error("geometry is missing")]
    Missing,
    #[error("unsupported geometry type {0:?}")]
    Unsupported(String),
    #[error("malformed coordinates: {0}")]
    Malformed(String),
    #[error("unusable polygon: {0}")]
    Unusable(UnionError),
}

impl Shape {
    /// GeoJSON `type` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Polygon(_) => "Polygon",
            Shape::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// View as a MultiPolygon, cloning a lone Polygon into a one-element set.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Shape::Polygon(p) => MultiPolygon(vec![p.clone()]),
            Shape::MultiPolygon(mp) => mp.clone(),
        }
    }

    /// Wrap a union result, collapsing single-member sets to a Polygon.
    /// Returns `None` for an empty set.
    pub fn from_multi_polygon(mut mp: MultiPolygon<f64>) -> Option<Self> {
        match mp.0.len() {
            0 => None,
            1 => mp.0.pop().map(Shape::Polygon),
            _ => Some(Shape::MultiPolygon(mp)),
        }
    }

    /// Iterate over member polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        let polygons: &[Polygon<f64>] = match self {
            Shape::Polygon(p) => std::slice::from_ref(p),
            Shape::MultiPolygon(mp) => &mp.0,
        };
        polygons.iter()
    }

    /// Parse a GeoJSON geometry object. `null` and other geometry types are
    /// reported as issues, never as hard errors.
    pub fn from_geojson(geometry: &Value) -> Result<Self, GeometryIssue> {
        let object = match geometry {
            Value::Null => return Err(GeometryIssue::Missing),
            Value::Object(object) => object,
            other => return Err(GeometryIssue::Malformed(format!("geometry is not an object: {other}"))),
        };

        let ty = object.get("type").and_then(Value::as_str)
            .ok_or_else(|| GeometryIssue::Malformed("geometry has no type".into()))?;
        let coordinates = || object.get("coordinates").and_then(Value::as_array)
            .ok_or_else(|| GeometryIssue::Malformed(format!("{ty} has no coordinate array")));

        match ty {
            "Polygon" => Ok(Shape::Polygon(parse_polygon(coordinates()?)?)),
            "MultiPolygon" => {
                let polygons = coordinates()?.iter()
                    .map(|polygon| polygon.as_array()
                        .ok_or_else(|| GeometryIssue::Malformed("polygon is not an array".into()))
                        .and_then(|rings| parse_polygon(rings)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Shape::MultiPolygon(MultiPolygon(polygons)))
            }
            other => Err(GeometryIssue::Unsupported(other.to_string())),
        }
    }

    /// Serialize as a standard GeoJSON geometry object.
    pub fn to_geojson(&self) -> Value {
        match self {
            Shape::Polygon(p) => json!({
                "type": "Polygon",
                "coordinates": polygon_coords(p),
            }),
            Shape::MultiPolygon(mp) => json!({
                "type": "MultiPolygon",
                "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
            }),
        }
    }
}

/// Parse `[exterior, hole, hole, ...]` into a Polygon.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>, GeometryIssue> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| GeometryIssue::Malformed("ring is not an array".into()))
            .and_then(|coords| parse_ring(coords))
    });

    let exterior = rings.next()
        .ok_or_else(|| GeometryIssue::Malformed("polygon has no exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[x, y]` (or `[x, y, z]`) positions, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>, GeometryIssue> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for position in coords {
        let position = position.as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| GeometryIssue::Malformed(format!("invalid position {position}")))?;
        let x = position[0].as_f64()
            .ok_or_else(|| GeometryIssue::Malformed("x must be a number".into()))?;
        let y = position[1].as_f64()
            .ok_or_else(|| GeometryIssue::Malformed("y must be a number".into()))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }

    Ok(LineString(points))
}

fn ring_coords(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_coords)
        .collect()
}

/// One input feature: its geometry (or the reason it has none) plus its
/// untouched property bag.
#[derive(Debug, Clone)]
pub struct GeometryFeature {
    pub geometry: Result<Shape, GeometryIssue>,
    pub properties: Map<String, Value>,
}

impl GeometryFeature {
    pub fn new(geometry: Result<Shape, GeometryIssue>, properties: Map<String, Value>) -> Self {
        Self { geometry, properties }
    }

    /// Parse one GeoJSON Feature object. Only a feature that is not an object
    /// at all is an error; geometry problems are carried in `geometry`.
    pub fn from_geojson(feature: &Value) -> anyhow::Result<Self> {
        let object = feature.as_object()
            .ok_or_else(|| anyhow::anyhow!("[geom::shape] Feature is not a JSON object"))?;

        let geometry = object.get("geometry")
            .map_or(Err(GeometryIssue::Missing), Shape::from_geojson);
        let properties = object.get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Ok(Self { geometry, properties })
    }

    /// Raw `Description` markup, if present.
    pub fn descriptor(&self) -> Option<&str> {
        self.properties.get("Description").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
        })
    }

    #[test]
    fn parses_polygon() {
        let shape = Shape::from_geojson(&square()).unwrap();
        let Shape::Polygon(p) = &shape else { panic!("expected a polygon") };
        assert_eq!(p.exterior().0.len(), 5);
        assert!(p.interiors().is_empty());
        assert_eq!(shape.to_geojson(), square());
    }

    #[test]
    fn closes_open_rings_and_drops_z() {
        let shape = Shape::from_geojson(&json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0]]]],
        })).unwrap();
        let Shape::MultiPolygon(mp) = shape else { panic!("expected a multipolygon") };
        assert_eq!(mp.0.len(), 1);
        let ring = mp.0[0].exterior();
        assert_eq!(ring.0.len(), 4);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn classifies_problems() {
        assert_eq!(Shape::from_geojson(&Value::Null), Err(GeometryIssue::Missing));
        assert_eq!(
            Shape::from_geojson(&json!({ "type": "Point", "coordinates": [1.0, 2.0] })),
            Err(GeometryIssue::Unsupported("Point".into())),
        );
        assert!(matches!(
            Shape::from_geojson(&json!({ "type": "Polygon", "coordinates": [[["a", 0.0]]] })),
            Err(GeometryIssue::Malformed(_)),
        ));
        assert!(matches!(
            Shape::from_geojson(&json!({ "type": "Polygon", "coordinates": [] })),
            Err(GeometryIssue::Malformed(_)),
        ));
    }

    #[test]
    fn single_member_union_result_collapses_to_polygon() {
        let Shape::Polygon(p) = Shape::from_geojson(&square()).unwrap() else { unreachable!() };
        assert_eq!(Shape::from_multi_polygon(MultiPolygon(vec![p.clone()])), Some(Shape::Polygon(p.clone())));
        assert_eq!(Shape::from_multi_polygon(MultiPolygon(vec![])), None);
        let two = Shape::from_multi_polygon(MultiPolygon(vec![p.clone(), p])).unwrap();
        assert_eq!(two.type_name(), "MultiPolygon");
        assert_eq!(two.polygons().count(), 2);
    }

    #[test]
    fn feature_without_geometry_key_is_missing() {
        let feature = GeometryFeature::from_geojson(&json!({
            "type": "Feature",
            "properties": { "Description": "<th>PLN_AREA_N</th><td>X</td>" },
        })).unwrap();
        assert_eq!(feature.geometry, Err(GeometryIssue::Missing));
        assert_eq!(feature.descriptor(), Some("<th>PLN_AREA_N</th><td>X</td>"));
        assert!(GeometryFeature::from_geojson(&json!(7)).is_err());
    }
}
