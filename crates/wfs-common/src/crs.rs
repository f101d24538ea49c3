//! Coordinate Reference System descriptors and axis order resolution.
//!
//! Every supported identifier spelling is canonicalized to an EPSG code, and
//! descriptors compare equal whenever their EPSG codes match. That way
//! `urn:ogc:def:crs:EPSG::4326` (latitude first) and `EPSG:4326` forced to
//! lon/lat describe the same coordinate system even though they read
//! coordinates in different orders.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{OnceLock, RwLock};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{WfsError, WfsResult};

/// Prefix of the OGC URN spelling emitted in non-legacy output.
pub const OGC_URN_PREFIX: &str = "urn:ogc:def:crs:EPSG::";

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrder {
    /// Longitude/easting first, latitude/northing second.
    LonLat,
    /// Latitude/northing first, longitude/easting second.
    LatLon,
}

impl AxisOrder {
    /// Map a pair stored in this order to canonical (lon/easting, lat/northing) order.
    ///
    /// The mapping is its own inverse, so applying it to an output pair
    /// recovers the stored pair.
    pub fn apply(self, first: f64, second: f64) -> (f64, f64) {
        match self {
            AxisOrder::LonLat => (first, second),
            AxisOrder::LatLon => (second, first),
        }
    }

    /// Whether pairs stored in this order must be swapped for output.
    pub fn is_swapped(self) -> bool {
        self == AxisOrder::LatLon
    }
}

/// A resolved coordinate reference system.
///
/// Equality and hashing only consider the canonical EPSG code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrsDescriptor {
    epsg: u32,
    axis_order: AxisOrder,
    forced_lon_lat: bool,
}

impl CrsDescriptor {
    /// Create a descriptor directly from a canonical EPSG code.
    pub fn new(epsg: u32, axis_order: AxisOrder) -> Self {
        Self {
            epsg,
            axis_order,
            forced_lon_lat: false,
        }
    }

    pub fn epsg_code(&self) -> u32 {
        self.epsg
    }

    /// The order coordinates of this CRS are stored in.
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// True when lon/lat order was forced over the authority's declaration.
    pub fn is_forced_lon_lat(&self) -> bool {
        self.forced_lon_lat
    }

    /// Identifier in OGC URN form, e.g. `urn:ogc:def:crs:EPSG::4326`.
    pub fn urn(&self) -> String {
        format!("{}{}", OGC_URN_PREFIX, self.epsg)
    }

    /// Identifier in the short authority form, e.g. `EPSG:4326`.
    pub fn epsg_identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        is_geographic_code(self.epsg)
    }
}

impl PartialEq for CrsDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.epsg == other.epsg
    }
}

impl Eq for CrsDescriptor {}

impl Hash for CrsDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epsg.hash(state);
    }
}

impl fmt::Display for CrsDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Resolve a CRS identifier without caching.
///
/// Accepts the `EPSG:n`, `urn:ogc:def:crs:EPSG:[version]:n`,
/// `urn:x-ogc:def:crs:EPSG:n`, `http://www.opengis.net/gml/srs/epsg.xml#n`,
/// `http://www.opengis.net/def/crs/EPSG/0/n` and `CRS:84` spellings.
/// With `force_lon_lat` the descriptor reads coordinates lon/lat regardless
/// of what the authority declares.
pub fn resolve(code: &str, force_lon_lat: bool) -> WfsResult<CrsDescriptor> {
    let (epsg, implied_lon_lat) = parse_identifier(code)
        .ok_or_else(|| WfsError::UnknownAuthorityCode(code.to_string()))?;
    let epsg = canonical_code(epsg);
    let declared =
        declared_axis_order(epsg).ok_or_else(|| WfsError::UnknownAuthorityCode(code.to_string()))?;

    let forced = force_lon_lat || implied_lon_lat;
    let axis_order = if forced { AxisOrder::LonLat } else { declared };

    Ok(CrsDescriptor {
        epsg,
        axis_order,
        forced_lon_lat: forced && declared == AxisOrder::LatLon,
    })
}

/// Returns the EPSG code and whether the spelling implies lon/lat order.
fn parse_identifier(identifier: &str) -> Option<(u32, bool)> {
    let lower = identifier.trim().to_ascii_lowercase();

    match lower.as_str() {
        "crs:84"
        | "urn:ogc:def:crs:ogc:1.3:crs84"
        | "urn:ogc:def:crs:ogc::crs84"
        | "http://www.opengis.net/def/crs/ogc/1.3/crs84" => return Some((4326, true)),
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix("epsg:") {
        return parse_code(rest).map(|code| (code, false));
    }

    if let Some(rest) = lower
        .strip_prefix("urn:ogc:def:crs:epsg:")
        .or_else(|| lower.strip_prefix("urn:x-ogc:def:crs:epsg:"))
    {
        // Either "<code>" or "<version>:<code>", where the version may be empty
        let code = rest.rsplit_once(':').map_or(rest, |(_, code)| code);
        return parse_code(code).map(|code| (code, false));
    }

    if let Some(rest) = lower.strip_prefix("http://www.opengis.net/gml/srs/epsg.xml#") {
        return parse_code(rest).map(|code| (code, true));
    }

    if let Some(rest) = lower.strip_prefix("http://www.opengis.net/def/crs/epsg/0/") {
        return parse_code(rest).map(|code| (code, false));
    }

    None
}

fn parse_code(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn canonical_code(code: u32) -> u32 {
    match code {
        // Google's unofficial Web Mercator code
        900913 | 3785 => 3857,
        other => other,
    }
}

fn is_geographic_code(code: u32) -> bool {
    matches!(code, 4000..=4999) && !matches!(code, 4328 | 4978)
}

/// Axis order declared by the EPSG registry for the codes we know.
fn declared_axis_order(code: u32) -> Option<AxisOrder> {
    match code {
        // Geocentric systems inside the geographic block (X, Y, Z)
        4328 | 4978 => Some(AxisOrder::LonLat),
        4000..=4999 => Some(AxisOrder::LatLon),

        // Projected systems declaring northing first
        2180 | 3006 | 3035 | 3844 | 31466..=31469 => Some(AxisOrder::LatLon),

        // Projected systems declaring easting first
        3857 | 3395 | 3413 | 3031 | 5070 | 2154 | 27700 | 3112 | 2056 | 21781 => {
            Some(AxisOrder::LonLat)
        }
        25828..=25838 | 32601..=32660 | 32701..=32760 => Some(AxisOrder::LonLat),

        _ => None,
    }
}

/// Process-wide cache of resolved CRS descriptors.
///
/// Keyed by the identifier string and the force flag. Cache hits only take the
/// read lock; a miss resolves without holding any lock and then inserts, so
/// two threads racing on the same key both store an equal descriptor.
///
/// Hits do not refresh recency, so once full the cache evicts in insertion
/// order rather than least-recently-used order.
pub struct CrsResolver {
    cache: RwLock<LruCache<(String, bool), CrsDescriptor>>,
}

impl CrsResolver {
    /// Default number of cached identifiers.
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// The resolver shared by every request in this process.
    pub fn shared() -> &'static CrsResolver {
        static SHARED: OnceLock<CrsResolver> = OnceLock::new();
        SHARED.get_or_init(CrsResolver::new)
    }

    /// Resolve an identifier, consulting the cache first.
    pub fn resolve(&self, code: &str, force_lon_lat: bool) -> WfsResult<CrsDescriptor> {
        let key = (code.trim().to_string(), force_lon_lat);

        if let Ok(cache) = self.cache.read() {
            if let Some(descriptor) = cache.peek(&key) {
                return Ok(*descriptor);
            }
        }

        let descriptor = resolve(code, force_lon_lat)?;
        debug!(
            code = %code,
            force_lon_lat,
            epsg = descriptor.epsg_code(),
            axis_order = ?descriptor.axis_order(),
            "Resolved CRS"
        );

        if let Ok(mut cache) = self.cache.write() {
            cache.put(key, descriptor);
        }

        Ok(descriptor)
    }

    /// Number of cached identifiers.
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CrsResolver {
    fn default() -> Self {
        Self::new()
    }
}
