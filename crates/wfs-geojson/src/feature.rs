//! GeoJSON feature encoding.

use chrono::SecondsFormat;
use serde_json::{Map, Value};
use tracing::debug;

use wfs_common::{AttributeValue, AxisOrder, BoundingBox, Feature, WfsError, WfsResult};

use crate::geometry::{bbox_value, encode_geometry, geometry_extent, number};
use crate::options::{EncodingOptions, IdPolicy};

/// A feature object together with the extent of its default geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeature {
    pub value: Value,
    /// Only computed when feature bounding is enabled.
    pub bbox: Option<BoundingBox>,
}

/// Encode one feature as a GeoJSON feature object.
///
/// `axis_order` is the order the feature's layer stores coordinates in.
pub fn encode_feature(
    feature: &Feature,
    options: &EncodingOptions,
    axis_order: AxisOrder,
) -> WfsResult<EncodedFeature> {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::from("Feature"));

    let exposed = match &options.id_policy {
        IdPolicy::Natural => {
            object.insert("id".to_string(), Value::from(feature.id()));
            None
        }
        IdPolicy::Suppress => None,
        IdPolicy::ExposeAttribute(attribute) => {
            object.insert("id".to_string(), Value::from(exposed_id(feature, attribute)));
            Some(attribute.as_str())
        }
    };

    let geometry = match feature.geometry() {
        Some(geometry) => encode_geometry(geometry, axis_order).map_err(|e| match e {
            WfsError::InvalidGeometry(message) => {
                WfsError::InvalidGeometry(format!("feature {}: {}", feature.id(), message))
            }
            other => other,
        })?,
        None => {
            // Non-fatal: degrades to a null geometry
            let missing = WfsError::MissingGeometry(feature.id().to_string());
            debug!(error = %missing, "Writing null geometry");
            Value::Null
        }
    };
    object.insert("geometry".to_string(), geometry);

    if let Some(name) = feature.geometry_name() {
        object.insert("geometry_name".to_string(), Value::from(name));
    }

    let mut properties = Map::new();
    for (name, value) in feature.properties() {
        if Some(name) == exposed {
            continue;
        }
        properties.insert(name.to_string(), attribute_value(name, value, axis_order)?);
    }
    object.insert("properties".to_string(), Value::Object(properties));

    let bbox = if options.feature_bounding {
        feature
            .geometry()
            .and_then(|geometry| geometry_extent(geometry, axis_order))
    } else {
        None
    };
    if let Some(bbox) = &bbox {
        object.insert("bbox".to_string(), bbox_value(bbox));
    }

    Ok(EncodedFeature {
        value: Value::Object(object),
        bbox,
    })
}

/// `<value>-<localId>`, or the natural identifier when the attribute has no
/// usable value on this feature.
fn exposed_id(feature: &Feature, attribute: &str) -> String {
    match feature.attribute(attribute).and_then(AttributeValue::to_id_fragment) {
        Some(value) => format!("{}-{}", value, feature.local_id()),
        None => {
            debug!(
                feature = feature.id(),
                attribute, "Identifier attribute missing or null, using natural id"
            );
            feature.id().to_string()
        }
    }
}

/// JSON form of a non-default attribute.
pub fn attribute_value(name: &str, value: &AttributeValue, axis_order: AxisOrder) -> WfsResult<Value> {
    Ok(match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::from(*b),
        AttributeValue::Integer(i) => Value::from(*i),
        AttributeValue::Double(d) => {
            if !d.is_finite() {
                return Err(WfsError::UnsupportedAttributeType {
                    attribute: name.to_string(),
                    message: format!("{} cannot be represented in JSON", d),
                });
            }
            number(*d)
        }
        AttributeValue::String(s) => Value::from(s.as_str()),
        AttributeValue::Timestamp(t) => Value::from(t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        AttributeValue::Date(d) => Value::from(d.format("%Y-%m-%d").to_string()),
        AttributeValue::Geometry(geometry) => {
            encode_geometry(geometry, axis_order).map_err(|e| WfsError::UnsupportedAttributeType {
                attribute: name.to_string(),
                message: e.to_string(),
            })?
        }
    })
}
