//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// An axis-aligned bounding box in canonical (lon/easting, lat/northing) order.
///
/// The z range is only present when every coordinate folded into the box
/// carried a z value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_range: Option<(f64, f64)>,
}

impl BoundingBox {
    /// Create a new 2D bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            z_range: None,
        }
    }

    /// Degenerate box covering a single (already axis-mapped) coordinate.
    pub fn from_coord(coord: &Coord) -> Self {
        Self {
            min_x: coord.x,
            min_y: coord.y,
            max_x: coord.x,
            max_y: coord.y,
            z_range: coord.z.map(|z| (z, z)),
        }
    }

    /// Grow the box to include a coordinate.
    pub fn expand_to_include(&mut self, coord: &Coord) {
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
        self.z_range = match (self.z_range, coord.z) {
            (Some((min_z, max_z)), Some(z)) => Some((min_z.min(z), max_z.max(z))),
            _ => None,
        };
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            z_range: match (self.z_range, other.z_range) {
                (Some((a_min, a_max)), Some((b_min, b_max))) => {
                    Some((a_min.min(b_min), a_max.max(b_max)))
                }
                _ => None,
            },
        }
    }

    /// Fold an optional box into a running aggregate.
    pub fn merge(acc: Option<BoundingBox>, next: Option<BoundingBox>) -> Option<BoundingBox> {
        match (acc, next) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_3d(&self) -> bool {
        self.z_range.is_some()
    }

    /// The GeoJSON `bbox` member: `[minx, miny, maxx, maxy]`, or
    /// `[minx, miny, minz, maxx, maxy, maxz]` for 3D boxes.
    pub fn to_array(&self) -> Vec<f64> {
        match self.z_range {
            Some((min_z, max_z)) => vec![
                self.min_x, self.min_y, min_z, self.max_x, self.max_y, max_z,
            ],
            None => vec![self.min_x, self.min_y, self.max_x, self.max_y],
        }
    }
}
