//! GeoJSON output format for WFS GetFeature responses
//!
//! Turns a stream of [`wfs_common::Feature`]s into a GeoJSON
//! `FeatureCollection`, optionally wrapped in a JSONP callback.
//!
//! - [`geometry`] maps geometries to GeoJSON, putting coordinates in
//!   longitude/latitude order
//! - [`feature`] builds feature objects under one of three id policies
//! - [`collection`] streams the collection with `totalFeatures`, `crs` and `bbox`
//! - [`format_options`] parses the `format_options` request parameter
//!
//! # Example
//!
//! ```rust
//! use wfs_common::{AxisOrder, CrsDescriptor, Feature, Geometry};
//! use wfs_geojson::{encode_collection, EncodingOptions};
//!
//! let feature = Feature::new("roads.1")
//!     .with_crs(CrsDescriptor::new(4326, AxisOrder::LatLon))
//!     .with_geometry("the_geom", Some(Geometry::point(45.0, 7.0)));
//!
//! let value = encode_collection([feature], 1, &EncodingOptions::default(), None).unwrap();
//! assert_eq!(value["features"][0]["geometry"]["coordinates"][0], 7);
//! ```

pub mod collection;
pub mod config;
pub mod feature;
pub mod format_options;
pub mod geometry;
pub mod options;
pub mod output_format;
pub mod wrapper;

// Re-export commonly used types
pub use collection::{
    encode_collection, encode_response, write_collection, CollectionSummary,
    FeatureCollectionWriter,
};
pub use config::EncoderConfig;
pub use feature::{encode_feature, EncodedFeature};
pub use geometry::{encode_geometry, geometry_extent};
pub use options::{EncodingOptions, IdPolicy};
pub use output_format::{request_options, OutputFormat};
pub use wrapper::{wrap, ResponseWrapper, WrappedResponse};

/// Media types used in GeoJSON responses
pub mod media_types {
    /// Plain JSON media type
    pub const JSON: &str = "application/json";
    /// JSONP (callback-wrapped) media type
    pub const JAVASCRIPT: &str = "text/javascript";
}
