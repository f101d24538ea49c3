//! Features read from the upstream feature stream.

use chrono::{DateTime, NaiveDate, Utc};

use crate::crs::CrsDescriptor;
use crate::geometry::Geometry;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Geometry(Geometry),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            AttributeValue::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Plain text form used when the value becomes part of an identifier.
    /// Returns `None` for null and geometry values.
    pub fn to_id_fragment(&self) -> Option<String> {
        match self {
            AttributeValue::Null | AttributeValue::Geometry(_) => None,
            AttributeValue::Bool(b) => Some(b.to_string()),
            AttributeValue::Integer(i) => Some(i.to_string()),
            AttributeValue::Double(d) => Some(d.to_string()),
            AttributeValue::String(s) => Some(s.clone()),
            AttributeValue::Timestamp(t) => Some(t.to_rfc3339()),
            AttributeValue::Date(d) => Some(d.to_string()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        AttributeValue::Date(value)
    }
}

impl From<Geometry> for AttributeValue {
    fn from(value: Geometry) -> Self {
        AttributeValue::Geometry(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

/// One row of a layer.
///
/// Attributes keep declaration order. The default geometry is an ordinary
/// attribute whose name is recorded in `geometry_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    attributes: Vec<(String, AttributeValue)>,
    geometry_name: Option<String>,
    crs: Option<CrsDescriptor>,
}

impl Feature {
    /// Create a feature with its natural identifier, e.g. `PrimitiveGeoFeature.f001`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Vec::new(),
            geometry_name: None,
            crs: None,
        }
    }

    /// Set the CRS of the layer this feature belongs to.
    pub fn with_crs(mut self, crs: CrsDescriptor) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Add an attribute, replacing any existing value of the same name in place.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add the default geometry attribute. `None` declares the attribute with
    /// a null value.
    pub fn with_geometry(mut self, name: impl Into<String>, geometry: Option<Geometry>) -> Self {
        let name = name.into();
        self.geometry_name = Some(name.clone());
        self.set_attribute(name, geometry);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// The natural identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier suffix after the last `.`, or the whole identifier.
    pub fn local_id(&self) -> &str {
        self.id.rsplit_once('.').map_or(self.id.as_str(), |(_, local)| local)
    }

    /// Type name prefix of the natural identifier, if it has one.
    pub fn type_name(&self) -> Option<&str> {
        self.id.rsplit_once('.').map(|(type_name, _)| type_name)
    }

    pub fn crs(&self) -> Option<CrsDescriptor> {
        self.crs
    }

    pub fn geometry_name(&self) -> Option<&str> {
        self.geometry_name.as_deref()
    }

    /// The default geometry, `None` when absent or null.
    pub fn geometry(&self) -> Option<&Geometry> {
        let name = self.geometry_name.as_deref()?;
        self.attribute(name).and_then(AttributeValue::as_geometry)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// All attributes in declaration order, including the default geometry.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Attributes other than the default geometry, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        let geometry_name = self.geometry_name.as_deref();
        self.attributes()
            .filter(move |(name, _)| Some(*name) != geometry_name)
    }
}
