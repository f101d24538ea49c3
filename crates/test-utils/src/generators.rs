//! Synthetic feature generators for benchmarks and volume tests.
//!
//! Output is deterministic: the same arguments always produce the same
//! features, so encoded documents can be compared across runs.

use wfs_common::{AxisOrder, Coord, CrsDescriptor, Feature, Geometry};

/// Creates `count` point features spread over the globe in a lat/lon layer.
///
/// Feature `i` is stored at latitude `(i % 180) - 90 + 0.5` and longitude
/// `(i * 7 % 360) - 180 + 0.25`.
///
/// # Example
///
/// ```
/// use test_utils::generate_points;
///
/// let features = generate_points(10);
/// assert_eq!(features.len(), 10);
/// assert_eq!(features[0].id(), "Points.1");
/// ```
pub fn generate_points(count: usize) -> Vec<Feature> {
    let crs = CrsDescriptor::new(4326, AxisOrder::LatLon);
    (0..count)
        .map(|i| {
            let lat = (i % 180) as f64 - 90.0 + 0.5;
            let lon = (i * 7 % 360) as f64 - 180.0 + 0.25;
            Feature::new(format!("Points.{}", i + 1))
                .with_crs(crs)
                .with_attribute("name", format!("point-{}", i))
                .with_attribute("value", i as f64 * 1.5)
                .with_geometry("the_geom", Some(Geometry::point(lat, lon)))
        })
        .collect()
}

/// Creates `count` line features of `vertices` vertices each in a lon/lat layer.
pub fn generate_lines(count: usize, vertices: usize) -> Vec<Feature> {
    let crs = CrsDescriptor::new(3857, AxisOrder::LonLat);
    (0..count)
        .map(|i| {
            let coords = (0..vertices)
                .map(|v| Coord::xy(i as f64 * 1000.0 + v as f64 * 10.5, v as f64 * 20.25))
                .collect();
            Feature::new(format!("Lines.{}", i + 1))
                .with_crs(crs)
                .with_attribute("segment", i as i64)
                .with_geometry("the_geom", Some(Geometry::line_string(coords)))
        })
        .collect()
}
