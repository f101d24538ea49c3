//! Geometry values carried by features.
//!
//! Coordinates are kept in the order the source layer stores them. Mapping to
//! the canonical output order happens in the output format, never here.

use serde::{Deserialize, Serialize};

use crate::error::{WfsError, WfsResult};

/// A 2D or 3D coordinate in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Number of ordinates (2 or 3).
    pub fn dimension(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

impl TryFrom<Vec<f64>> for Coord {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Coord::xy(*x, *y)),
            [x, y, z] => Ok(Coord::xyz(*x, *y, *z)),
            other => Err(format!(
                "a position needs 2 or 3 ordinates, got {}",
                other.len()
            )),
        }
    }
}

impl From<Coord> for Vec<f64> {
    fn from(coord: Coord) -> Self {
        match coord.z {
            Some(z) => vec![coord.x, coord.y, z],
            None => vec![coord.x, coord.y],
        }
    }
}

/// Geometry types supported in feature streams.
///
/// The serde form matches GeoJSON geometry objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Coord },
    LineString { coordinates: Vec<Coord> },
    /// First ring is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<Coord>> },
    MultiPoint { coordinates: Vec<Coord> },
    MultiLineString { coordinates: Vec<Vec<Coord>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Coord>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point {
            coordinates: Coord::xy(x, y),
        }
    }

    pub fn line_string(coordinates: Vec<Coord>) -> Self {
        Geometry::LineString { coordinates }
    }

    pub fn polygon(rings: Vec<Vec<Coord>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    pub fn multi_point(coordinates: Vec<Coord>) -> Self {
        Geometry::MultiPoint { coordinates }
    }

    pub fn multi_line_string(lines: Vec<Vec<Coord>>) -> Self {
        Geometry::MultiLineString { coordinates: lines }
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<Coord>>>) -> Self {
        Geometry::MultiPolygon {
            coordinates: polygons,
        }
    }

    pub fn collection(geometries: Vec<Geometry>) -> Self {
        Geometry::GeometryCollection { geometries }
    }

    /// Canonical GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Visit every coordinate in storage order.
    pub fn visit_coords<F: FnMut(&Coord)>(&self, f: &mut F) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                coordinates.iter().for_each(|c| f(c))
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter().flatten().for_each(|c| f(c))
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(|c| f(c))
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.visit_coords(f);
                }
            }
        }
    }

    /// Total number of coordinates.
    pub fn num_coords(&self) -> usize {
        let mut count = 0;
        self.visit_coords(&mut |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.num_coords() == 0
    }

    /// Check the structural invariants the output formats rely on.
    ///
    /// Line strings, polygons and rings must not be empty; every ordinate
    /// must be finite; all coordinates share one dimension.
    pub fn validate(&self) -> WfsResult<()> {
        self.check_sequences()?;

        let mut dimension = None;
        let mut problem = None;
        self.visit_coords(&mut |c| {
            if problem.is_some() {
                return;
            }
            if !c.is_finite() {
                problem = Some(format!("non-finite ordinate in {:?}", c));
                return;
            }
            match dimension {
                None => dimension = Some(c.dimension()),
                Some(d) if d != c.dimension() => {
                    problem = Some(format!(
                        "mixed {}D and {}D coordinates in one {}",
                        d,
                        c.dimension(),
                        self.type_name()
                    ));
                }
                Some(_) => {}
            }
        });

        match problem {
            Some(message) => Err(WfsError::InvalidGeometry(message)),
            None => Ok(()),
        }
    }

    fn check_sequences(&self) -> WfsResult<()> {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => Ok(()),
            Geometry::LineString { coordinates } => require_coords(coordinates, "LineString"),
            Geometry::Polygon { coordinates } => check_rings(coordinates),
            Geometry::MultiLineString { coordinates } => coordinates
                .iter()
                .try_for_each(|line| require_coords(line, "LineString member")),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().try_for_each(|rings| check_rings(rings))
            }
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().try_for_each(|g| g.check_sequences())
            }
        }
    }
}

fn require_coords(coords: &[Coord], what: &str) -> WfsResult<()> {
    if coords.is_empty() {
        return Err(WfsError::InvalidGeometry(format!(
            "{} has an empty coordinate sequence",
            what
        )));
    }
    Ok(())
}

fn check_rings(rings: &[Vec<Coord>]) -> WfsResult<()> {
    if rings.is_empty() {
        return Err(WfsError::InvalidGeometry("Polygon has no rings".to_string()));
    }
    rings.iter().try_for_each(|ring| require_coords(ring, "Polygon ring"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::xy(0.0, 0.0),
            Coord::xy(1.0, 0.0),
            Coord::xy(1.0, 1.0),
            Coord::xy(0.0, 1.0),
            Coord::xy(0.0, 0.0),
        ]
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Geometry::point(1.0, 2.0).type_name(), "Point");
        assert_eq!(
            Geometry::multi_line_string(vec![]).type_name(),
            "MultiLineString"
        );
        assert_eq!(
            Geometry::collection(vec![]).type_name(),
            "GeometryCollection"
        );
    }

    #[test]
    fn test_num_coords_recurses() {
        let geometry = Geometry::collection(vec![
            Geometry::point(1.0, 2.0),
            Geometry::polygon(vec![square()]),
            Geometry::multi_point(vec![Coord::xy(3.0, 4.0), Coord::xy(5.0, 6.0)]),
        ]);
        assert_eq!(geometry.num_coords(), 8);
        assert!(!geometry.is_empty());
        assert!(Geometry::multi_polygon(vec![]).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_sequences() {
        assert!(Geometry::line_string(vec![]).validate().is_err());
        assert!(Geometry::polygon(vec![]).validate().is_err());
        assert!(Geometry::polygon(vec![square(), vec![]]).validate().is_err());
        assert!(Geometry::multi_line_string(vec![vec![]]).validate().is_err());

        // Empty multi geometries and collections are fine
        assert!(Geometry::multi_point(vec![]).validate().is_ok());
        assert!(Geometry::collection(vec![]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mixed_dimensions() {
        let mixed = Geometry::line_string(vec![Coord::xy(0.0, 0.0), Coord::xyz(1.0, 1.0, 1.0)]);
        match mixed.validate() {
            Err(WfsError::InvalidGeometry(message)) => assert!(message.contains("mixed")),
            other => panic!("expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let nan = Geometry::point(f64::NAN, 0.0);
        assert!(matches!(nan.validate(), Err(WfsError::InvalidGeometry(_))));
    }

    #[test]
    fn test_deserialize_geojson_shape() {
        let line: Geometry = serde_json::from_str(
            r#"{"type":"LineString","coordinates":[[0,0,50],[120,0,100]]}"#,
        )
        .unwrap();
        assert_eq!(
            line,
            Geometry::line_string(vec![
                Coord::xyz(0.0, 0.0, 50.0),
                Coord::xyz(120.0, 0.0, 100.0)
            ])
        );

        let collection: Geometry = serde_json::from_str(
            r#"{"type":"GeometryCollection","geometries":[{"type":"Point","coordinates":[1,2]}]}"#,
        )
        .unwrap();
        assert_eq!(
            collection,
            Geometry::collection(vec![Geometry::point(1.0, 2.0)])
        );

        let bad = serde_json::from_str::<Geometry>(r#"{"type":"Point","coordinates":[1]}"#);
        assert!(bad.is_err());
    }
}
