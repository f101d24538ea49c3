//! Batch GeoJSON export.
//!
//! Reads newline-delimited feature records, encodes them as one GeoJSON
//! FeatureCollection and writes the document to a file or stdout.

pub mod config;
pub mod export;
pub mod record;

pub use config::ExportConfig;
pub use export::{export, ExportRequest, ExportSummary};
pub use record::FeatureRecord;
