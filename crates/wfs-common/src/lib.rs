//! Common types shared by the WFS output formats.
//!
//! The feature stream handed to an output format is made of [`Feature`]s, each
//! carrying its attributes, the name of its default geometry attribute and the
//! [`CrsDescriptor`] of the layer it was read from.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod feature;
pub mod geometry;

pub use bbox::BoundingBox;
pub use crs::{AxisOrder, CrsDescriptor, CrsResolver};
pub use error::{WfsError, WfsResult};
pub use feature::{AttributeValue, Feature};
pub use geometry::{Coord, Geometry};
