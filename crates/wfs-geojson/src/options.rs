//! Per-request encoding options.

use wfs_common::{AxisOrder, CrsDescriptor};

/// How the `id` member of each feature is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Emit the natural identifier, e.g. `PrimitiveGeoFeature.f001`.
    #[default]
    Natural,
    /// Omit `id` entirely.
    Suppress,
    /// Build `id` as `<value>-<localId>` from the named attribute, and drop
    /// that attribute from `properties`.
    ExposeAttribute(String),
}

/// Options consumed by the encoders for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingOptions {
    pub id_policy: IdPolicy,
    /// Emit per-feature `bbox` members and the collection `bbox`.
    pub feature_bounding: bool,
    /// Wrap the document in `callback(...)`.
    pub callback: Option<String>,
    /// Legacy CRS handling: `EPSG:<code>` names and coordinates written in
    /// storage order.
    pub legacy_crs: bool,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::Natural,
            feature_bounding: true,
            callback: None,
            legacy_crs: false,
        }
    }
}

impl EncodingOptions {
    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    pub fn with_feature_bounding(mut self, enabled: bool) -> Self {
        self.feature_bounding = enabled;
        self
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn with_legacy_crs(mut self, legacy: bool) -> Self {
        self.legacy_crs = legacy;
        self
    }

    /// Axis order used to map coordinates of a layer in `crs` to output order.
    pub fn output_axis_order(&self, crs: Option<CrsDescriptor>) -> AxisOrder {
        match crs {
            Some(crs) if !self.legacy_crs => crs.axis_order(),
            _ => AxisOrder::LonLat,
        }
    }

    /// The `crs.properties.name` value written for `crs`.
    pub fn crs_name(&self, crs: &CrsDescriptor) -> String {
        if self.legacy_crs {
            crs.epsg_identifier()
        } else {
            crs.urn()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EncodingOptions::default();
        assert_eq!(options.id_policy, IdPolicy::Natural);
        assert!(options.feature_bounding);
        assert!(options.callback.is_none());
        assert!(!options.legacy_crs);
    }

    #[test]
    fn test_output_axis_order() {
        let lat_lon = CrsDescriptor::new(4326, AxisOrder::LatLon);
        let options = EncodingOptions::default();
        assert_eq!(options.output_axis_order(Some(lat_lon)), AxisOrder::LatLon);
        assert_eq!(options.output_axis_order(None), AxisOrder::LonLat);

        let legacy = options.with_legacy_crs(true);
        assert_eq!(legacy.output_axis_order(Some(lat_lon)), AxisOrder::LonLat);
    }

    #[test]
    fn test_crs_name() {
        let crs = CrsDescriptor::new(4326, AxisOrder::LatLon);
        assert_eq!(
            EncodingOptions::default().crs_name(&crs),
            "urn:ogc:def:crs:EPSG::4326"
        );
        assert_eq!(
            EncodingOptions::default().with_legacy_crs(true).crs_name(&crs),
            "EPSG:4326"
        );
    }
}
