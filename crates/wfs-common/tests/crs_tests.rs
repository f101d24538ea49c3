//! Tests for CRS resolution across identifier spellings.

use std::sync::Arc;
use std::thread;

use wfs_common::crs::{resolve, AxisOrder, CrsResolver};
use wfs_common::WfsError;

// ============================================================================
// Spelling equivalence
// ============================================================================

#[test]
fn test_all_spellings_resolve_to_same_system() {
    let spellings = [
        "EPSG:4326",
        "epsg:4326",
        "urn:ogc:def:crs:EPSG::4326",
        "urn:ogc:def:crs:EPSG:6.6:4326",
        "urn:x-ogc:def:crs:EPSG:4326",
        "http://www.opengis.net/gml/srs/epsg.xml#4326",
        "http://www.opengis.net/def/crs/EPSG/0/4326",
        "CRS:84",
    ];

    let reference = resolve("EPSG:4326", false).unwrap();
    for spelling in spellings {
        for force in [false, true] {
            let descriptor = resolve(spelling, force).unwrap();
            assert_eq!(descriptor, reference, "{} (force={})", spelling, force);
        }
    }
}

#[test]
fn test_urn_round_trip_is_equivalent() {
    for code in ["EPSG:4326", "EPSG:4327", "EPSG:3857", "EPSG:32633", "EPSG:3035"] {
        for force in [false, true] {
            let original = resolve(code, force).unwrap();
            let decoded = resolve(&original.urn(), false).unwrap();
            assert_eq!(decoded, original, "{}", code);

            let legacy = resolve(&original.epsg_identifier(), false).unwrap();
            assert_eq!(legacy, original, "{}", code);
        }
    }
}

// ============================================================================
// Axis order
// ============================================================================

#[test]
fn test_urn_declares_lat_lon_for_geographic() {
    let urn = resolve("urn:ogc:def:crs:EPSG::4326", false).unwrap();
    assert_eq!(urn.axis_order(), AxisOrder::LatLon);
    assert!(urn.axis_order().is_swapped());
}

#[test]
fn test_gml_http_spelling_is_lon_lat() {
    let http = resolve("http://www.opengis.net/gml/srs/epsg.xml#4326", false).unwrap();
    assert_eq!(http.axis_order(), AxisOrder::LonLat);
}

#[test]
fn test_utm_zones_are_east_north() {
    for code in ["EPSG:32601", "EPSG:32660", "EPSG:32701", "EPSG:32760"] {
        assert_eq!(resolve(code, false).unwrap().axis_order(), AxisOrder::LonLat);
    }
    assert!(resolve("EPSG:32661", false).is_err());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unknown_codes_carry_input() {
    for code in ["EPSG:99999", "urn:ogc:def:crs:EPSG::", "FOO:4326", ""] {
        match resolve(code, false) {
            Err(WfsError::UnknownAuthorityCode(c)) => assert_eq!(c, code),
            other => panic!("{}: expected UnknownAuthorityCode, got {:?}", code, other),
        }
    }
}

// ============================================================================
// Shared cache
// ============================================================================

#[test]
fn test_concurrent_resolution_is_consistent() {
    let resolver = Arc::new(CrsResolver::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                let force = i % 2 == 0;
                resolver.resolve("urn:ogc:def:crs:EPSG::4326", force).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let descriptor = handle.join().unwrap();
        let expected = if i % 2 == 0 {
            AxisOrder::LonLat
        } else {
            AxisOrder::LatLon
        };
        assert_eq!(descriptor.axis_order(), expected);
    }

    assert_eq!(resolver.len(), 2);
}

#[test]
fn test_shared_resolver_is_a_singleton() {
    let a = CrsResolver::shared() as *const CrsResolver;
    let b = CrsResolver::shared() as *const CrsResolver;
    assert_eq!(a, b);
    assert!(CrsResolver::shared().resolve("EPSG:3857", false).is_ok());
}
