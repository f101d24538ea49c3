//! Shared test utilities for the wfs-geojson workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Feature layers modelled on the WFS conformance test data
//! - Generators for large synthetic feature streams
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::fixtures;
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
