//! Common test fixtures for wfs-geojson tests.
//!
//! Layers mirror the simple-features conformance data: each function returns
//! every feature of one layer, already tagged with the layer CRS.

use chrono::{NaiveDate, TimeZone, Utc};
use wfs_common::{crs::resolve, Coord, CrsDescriptor, Feature, Geometry};

/// Common CRS identifiers.
pub mod crs {
    /// WGS84 geographic, short form
    pub const EPSG_4326: &str = "EPSG:4326";

    /// WGS84 geographic, OGC URN form (lat/lon)
    pub const URN_4326: &str = "urn:ogc:def:crs:EPSG::4326";

    /// WGS84 3D
    pub const EPSG_4327: &str = "EPSG:4327";

    /// Web Mercator
    pub const EPSG_3857: &str = "EPSG:3857";
}

/// Layer type names.
pub mod layers {
    pub const PRIMITIVE_GEO_FEATURE: &str = "PrimitiveGeoFeature";
    pub const AGGREGATE_GEO_FEATURE: &str = "AggregateGeoFeature";
    pub const LINE_3D: &str = "Line3D";
    pub const POINT_LAT_LON: &str = "PointLatLon";
    pub const POINT_LON_LAT: &str = "PointLonLat";
    pub const MERCATOR_POINTS: &str = "MercatorPoints";
}

fn layer_crs(code: &str, force_lon_lat: bool) -> CrsDescriptor {
    resolve(code, force_lon_lat).expect("fixture CRS must resolve")
}

/// Five features with mixed geometry types and scalar attributes.
///
/// `f004` has a null default geometry. Names are Greek letters so that the
/// `name` attribute id policy yields `alpha-f001` and so on.
pub fn primitive_geo_features() -> Vec<Feature> {
    let crs = layer_crs(crs::EPSG_4326, true);
    let names = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let surfaces = [
        Some(Geometry::point(-59.0, 20.0)),
        Some(Geometry::line_string(vec![
            Coord::xy(-59.0, 20.0),
            Coord::xy(-58.0, 21.0),
        ])),
        Some(Geometry::polygon(vec![vec![
            Coord::xy(-30.0, 10.0),
            Coord::xy(-25.0, 10.0),
            Coord::xy(-25.0, 15.0),
            Coord::xy(-30.0, 10.0),
        ]])),
        None,
        Some(Geometry::point(7.5, 46.25)),
    ];

    names
        .iter()
        .zip(surfaces)
        .enumerate()
        .map(|(i, (name, surface))| {
            let n = i + 1;
            Feature::new(format!("{}.f00{}", layers::PRIMITIVE_GEO_FEATURE, n))
                .with_crs(crs)
                .with_attribute("description", format!("description-f00{}", n))
                .with_attribute("name", *name)
                .with_geometry("surfaceProperty", surface)
                .with_attribute("pointProperty", Geometry::point(-29.5, 12.5 + i as f64))
                .with_attribute("intProperty", 150 + n as i64)
                .with_attribute("measurand", (n != 3).then(|| 12.5 * n as f64))
                .with_attribute(
                    "dateTimeProperty",
                    Utc.with_ymd_and_hms(2007, 9, n as u32, 13, 30, 0)
                        .single()
                        .expect("valid fixture timestamp"),
                )
                .with_attribute(
                    "dateProperty",
                    NaiveDate::from_ymd_opt(2007, 9, n as u32).expect("valid fixture date"),
                )
        })
        .collect()
}

/// Three multi-curve features. The first coordinate of the first is `55.174`.
pub fn aggregate_geo_features() -> Vec<Feature> {
    let crs = layer_crs(crs::EPSG_4326, true);
    let curves = [
        vec![
            vec![Coord::xy(55.174, -1.5), Coord::xy(52.17, -1.2)],
            vec![Coord::xy(55.7, -1.8), Coord::xy(55.1, -1.0)],
        ],
        vec![vec![Coord::xy(40.0, 10.0), Coord::xy(41.0, 11.0)]],
        vec![vec![Coord::xy(-12.0, 8.0), Coord::xy(-10.5, 9.25)]],
    ];

    curves
        .into_iter()
        .enumerate()
        .map(|(i, lines)| {
            Feature::new(format!("{}.f00{}", layers::AGGREGATE_GEO_FEATURE, i + 5))
                .with_crs(crs)
                .with_attribute("description", format!("aggregate {}", i + 1))
                .with_attribute("name", format!("agg-{}", i + 1))
                .with_geometry("multiCurveProperty", Some(Geometry::multi_line_string(lines)))
                .with_attribute("doubleProperty", 2012.78 + i as f64)
        })
        .collect()
}

/// One 3D line in EPSG:4327, stored lon/lat: `(0 0 50, 120 0 100)`.
pub fn line_3d() -> Vec<Feature> {
    vec![Feature::new(format!("{}.1", layers::LINE_3D))
        .with_crs(layer_crs(crs::EPSG_4327, true))
        .with_attribute("name", "line3d")
        .with_geometry(
            "the_geom",
            Some(Geometry::line_string(vec![
                Coord::xyz(0.0, 0.0, 50.0),
                Coord::xyz(120.0, 0.0, 100.0),
            ])),
        )]
}

/// Three points in a lat/lon layer, stored latitude first.
///
/// In output order they are `(120 0)`, `(-170 45)` and `(60 -30)`.
pub fn point_lat_lon() -> Vec<Feature> {
    points(
        layers::POINT_LAT_LON,
        layer_crs(crs::URN_4326, false),
        &[(0.0, 120.0), (45.0, -170.0), (-30.0, 60.0)],
    )
}

/// The points of [`point_lat_lon`] in a layer stored longitude first.
pub fn point_lon_lat() -> Vec<Feature> {
    points(
        layers::POINT_LON_LAT,
        layer_crs(crs::EPSG_4326, true),
        &[(120.0, 0.0), (-170.0, 45.0), (60.0, -30.0)],
    )
}

/// Two projected points in Web Mercator.
pub fn mercator_points() -> Vec<Feature> {
    points(
        layers::MERCATOR_POINTS,
        layer_crs(crs::EPSG_3857, false),
        &[(1_113_194.9, 6_446_275.8), (-8_238_310.2, 4_970_071.6)],
    )
}

fn points(type_name: &str, crs: CrsDescriptor, stored: &[(f64, f64)]) -> Vec<Feature> {
    stored
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            Feature::new(format!("{}.{}", type_name, i + 1))
                .with_crs(crs)
                .with_attribute("name", format!("point {}", i + 1))
                .with_geometry("geom", Some(Geometry::point(x, y)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfs_common::AxisOrder;

    #[test]
    fn test_layer_sizes() {
        assert_eq!(primitive_geo_features().len(), 5);
        assert_eq!(aggregate_geo_features().len(), 3);
        assert_eq!(line_3d().len(), 1);
        assert_eq!(point_lat_lon().len(), 3);
        assert_eq!(point_lon_lat().len(), 3);
    }

    #[test]
    fn test_layer_axis_orders() {
        assert_eq!(point_lat_lon()[0].crs().map(|c| c.axis_order()), Some(AxisOrder::LatLon));
        assert_eq!(point_lon_lat()[0].crs().map(|c| c.axis_order()), Some(AxisOrder::LonLat));
        assert_eq!(line_3d()[0].crs().map(|c| c.epsg_code()), Some(4327));
    }

    #[test]
    fn test_primitive_geometry_name() {
        let features = primitive_geo_features();
        assert_eq!(features[0].geometry_name(), Some("surfaceProperty"));
        assert!(features[3].geometry().is_none());
    }
}
