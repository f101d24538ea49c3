//! Input feature records.

use serde::Deserialize;
use serde_json::{Map, Value};

use wfs_common::{AttributeValue, CrsDescriptor, Feature, Geometry, WfsError, WfsResult};

/// Geometry attribute name used when a record carries a geometry but no name.
pub const DEFAULT_GEOMETRY_NAME: &str = "geometry";

/// One line of the input stream.
///
/// ```json
/// {"id": "roads.1", "crs": "EPSG:4326", "geometry_name": "the_geom",
///  "geometry": {"type": "Point", "coordinates": [45.0, 7.0]},
///  "properties": {"name": "Main St"}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRecord {
    pub id: String,
    /// CRS identifier of the record's layer, any spelling the resolver accepts.
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub geometry_name: Option<String>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl FeatureRecord {
    /// Build the feature, tagged with `crs`.
    ///
    /// The default geometry comes first, then properties in input order. A
    /// property named like the geometry attribute is rejected.
    pub fn into_feature(self, crs: Option<CrsDescriptor>) -> WfsResult<Feature> {
        let mut feature = Feature::new(self.id);
        if let Some(crs) = crs {
            feature = feature.with_crs(crs);
        }

        let geometry = match self.geometry {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<Geometry>(value).map_err(|e| {
                WfsError::InvalidGeometry(format!("feature {}: {}", feature.id(), e))
            })?),
        };
        match (self.geometry_name, geometry) {
            (Some(name), geometry) => feature = feature.with_geometry(name, geometry),
            (None, Some(geometry)) => {
                feature = feature.with_geometry(DEFAULT_GEOMETRY_NAME, Some(geometry))
            }
            (None, None) => {}
        }

        for (name, value) in self.properties {
            if feature.geometry_name() == Some(name.as_str()) {
                return Err(WfsError::UnsupportedAttributeType {
                    attribute: name,
                    message: "property has the same name as the geometry attribute".to_string(),
                });
            }
            let value = attribute_from_json(&name, value)?;
            feature.set_attribute(name, value);
        }

        Ok(feature)
    }
}

/// Convert a JSON property value.
///
/// Objects are accepted only as GeoJSON geometries; arrays are rejected.
pub fn attribute_from_json(name: &str, value: Value) -> WfsResult<AttributeValue> {
    match value {
        Value::Null => Ok(AttributeValue::Null),
        Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(AttributeValue::Integer(i)),
            None => n.as_f64().map(AttributeValue::Double).ok_or_else(|| {
                WfsError::UnsupportedAttributeType {
                    attribute: name.to_string(),
                    message: format!("number {} out of range", n),
                }
            }),
        },
        Value::String(s) => Ok(AttributeValue::String(s)),
        Value::Object(object) if object.contains_key("type") => {
            serde_json::from_value::<Geometry>(Value::Object(object))
                .map(AttributeValue::Geometry)
                .map_err(|e| WfsError::UnsupportedAttributeType {
                    attribute: name.to_string(),
                    message: e.to_string(),
                })
        }
        Value::Object(_) => Err(WfsError::UnsupportedAttributeType {
            attribute: name.to_string(),
            message: "nested objects are not supported".to_string(),
        }),
        Value::Array(_) => Err(WfsError::UnsupportedAttributeType {
            attribute: name.to_string(),
            message: "arrays are not supported".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wfs_common::{AxisOrder, Coord};

    fn record(value: Value) -> FeatureRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let feature = record(json!({
            "id": "roads.1",
            "crs": "EPSG:4326",
            "geometry_name": "the_geom",
            "geometry": {"type": "LineString", "coordinates": [[0, 1], [2, 3]]},
            "properties": {"name": "Main St", "lanes": 2, "width": 7.5, "paved": true, "note": null}
        }))
        .into_feature(Some(CrsDescriptor::new(4326, AxisOrder::LatLon)))
        .unwrap();

        assert_eq!(feature.id(), "roads.1");
        assert_eq!(feature.geometry_name(), Some("the_geom"));
        assert_eq!(
            feature.geometry(),
            Some(&Geometry::line_string(vec![Coord::xy(0.0, 1.0), Coord::xy(2.0, 3.0)]))
        );
        let names: Vec<&str> = feature.properties().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "lanes", "width", "paved", "note"]);
        assert_eq!(feature.attribute("lanes"), Some(&AttributeValue::Integer(2)));
        assert_eq!(feature.attribute("width"), Some(&AttributeValue::Double(7.5)));
        assert_eq!(feature.attribute("note"), Some(&AttributeValue::Null));
        assert_eq!(feature.crs().map(|c| c.epsg_code()), Some(4326));
    }

    #[test]
    fn test_geometry_name_defaults() {
        let feature = record(json!({"id": "a.1", "geometry": {"type": "Point", "coordinates": [1, 2]}}))
            .into_feature(None)
            .unwrap();
        assert_eq!(feature.geometry_name(), Some(DEFAULT_GEOMETRY_NAME));

        let feature = record(json!({"id": "a.2", "geometry_name": "geom", "geometry": null}))
            .into_feature(None)
            .unwrap();
        assert_eq!(feature.geometry_name(), Some("geom"));
        assert!(feature.geometry().is_none());

        let feature = record(json!({"id": "a.3"})).into_feature(None).unwrap();
        assert_eq!(feature.geometry_name(), None);
    }

    #[test]
    fn test_invalid_geometry_is_feature_local() {
        let err = record(json!({"id": "a.4", "geometry": {"type": "Hexagon", "coordinates": []}}))
            .into_feature(None)
            .unwrap_err();
        assert!(matches!(err, WfsError::InvalidGeometry(_)));
        assert!(err.is_feature_local());
    }

    #[test]
    fn test_property_named_like_geometry_rejected() {
        let err = record(json!({
            "id": "a.5",
            "geometry_name": "the_geom",
            "geometry": {"type": "Point", "coordinates": [1, 2]},
            "properties": {"the_geom": "oops"}
        }))
        .into_feature(None)
        .unwrap_err();
        assert!(matches!(
            &err,
            WfsError::UnsupportedAttributeType { attribute, .. } if attribute == "the_geom"
        ));
        assert!(err.is_feature_local());

        // The default name is reserved too
        let err = record(json!({
            "id": "a.6",
            "geometry": {"type": "Point", "coordinates": [1, 2]},
            "properties": {"geometry": 3}
        }))
        .into_feature(None)
        .unwrap_err();
        assert!(matches!(err, WfsError::UnsupportedAttributeType { .. }));

        // Without a geometry any property name is fine
        let feature = record(json!({"id": "a.7", "properties": {"geometry": 3}}))
            .into_feature(None)
            .unwrap();
        assert_eq!(feature.attribute("geometry"), Some(&AttributeValue::Integer(3)));
    }

    #[test]
    fn test_attribute_conversion() {
        assert_eq!(
            attribute_from_json("p", json!({"type": "Point", "coordinates": [1, 2]})).unwrap(),
            AttributeValue::Geometry(Geometry::point(1.0, 2.0))
        );
        assert!(matches!(
            attribute_from_json("tags", json!(["a", "b"])),
            Err(WfsError::UnsupportedAttributeType { .. })
        ));
        assert!(matches!(
            attribute_from_json("meta", json!({"k": "v"})),
            Err(WfsError::UnsupportedAttributeType { .. })
        ));
    }
}
