//! GeoJSON geometry encoding.
//!
//! Coordinates are written in canonical (lon/easting, lat/northing) order: the
//! layer's [`AxisOrder`] is applied to every position, z always stays third.

use serde_json::{Map, Number, Value};

use wfs_common::{AxisOrder, BoundingBox, Coord, Geometry, WfsResult};

/// Largest magnitude at which every integral f64 is exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encode a geometry as a GeoJSON geometry object.
pub fn encode_geometry(geometry: &Geometry, axis_order: AxisOrder) -> WfsResult<Value> {
    geometry.validate()?;
    Ok(encode_validated(geometry, axis_order))
}

fn encode_validated(geometry: &Geometry, axis_order: AxisOrder) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::from(geometry.type_name()));

    match geometry {
        Geometry::GeometryCollection { geometries } => {
            let members = geometries
                .iter()
                .map(|g| encode_validated(g, axis_order))
                .collect();
            object.insert("geometries".to_string(), Value::Array(members));
        }
        other => {
            object.insert("coordinates".to_string(), coordinates(other, axis_order));
        }
    }

    Value::Object(object)
}

fn coordinates(geometry: &Geometry, axis_order: AxisOrder) -> Value {
    match geometry {
        Geometry::Point { coordinates } => position(coordinates, axis_order),
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            positions(coordinates, axis_order)
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            Value::Array(
                coordinates
                    .iter()
                    .map(|ring| positions(ring, axis_order))
                    .collect(),
            )
        }
        Geometry::MultiPolygon { coordinates } => Value::Array(
            coordinates
                .iter()
                .map(|polygon| {
                    Value::Array(
                        polygon
                            .iter()
                            .map(|ring| positions(ring, axis_order))
                            .collect(),
                    )
                })
                .collect(),
        ),
        // Collections carry "geometries", handled by the caller
        Geometry::GeometryCollection { .. } => Value::Array(Vec::new()),
    }
}

fn positions(coords: &[Coord], axis_order: AxisOrder) -> Value {
    Value::Array(coords.iter().map(|c| position(c, axis_order)).collect())
}

/// A single position: `[x, y]` or `[x, y, z]` after axis mapping.
pub fn position(coord: &Coord, axis_order: AxisOrder) -> Value {
    let (x, y) = axis_order.apply(coord.x, coord.y);
    let mut ordinates = vec![number(x), number(y)];
    if let Some(z) = coord.z {
        ordinates.push(number(z));
    }
    Value::Array(ordinates)
}

/// JSON number for an ordinate. Integral values are written without a
/// fractional part; everything else, negative zero included, keeps full
/// f64 precision.
pub fn number(value: f64) -> Value {
    let negative_zero = value == 0.0 && value.is_sign_negative();
    if !negative_zero && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Extent of a geometry in canonical order, `None` when it has no coordinates.
pub fn geometry_extent(geometry: &Geometry, axis_order: AxisOrder) -> Option<BoundingBox> {
    let mut extent: Option<BoundingBox> = None;
    geometry.visit_coords(&mut |coord| {
        let (x, y) = axis_order.apply(coord.x, coord.y);
        let mapped = Coord { x, y, z: coord.z };
        match extent.as_mut() {
            Some(bbox) => bbox.expand_to_include(&mapped),
            None => extent = Some(BoundingBox::from_coord(&mapped)),
        }
    });
    extent
}

/// The GeoJSON `bbox` member for an extent.
pub fn bbox_value(bbox: &BoundingBox) -> Value {
    Value::Array(bbox.to_array().into_iter().map(number).collect())
}
