//! Coordinate model for GeoJSON geometries.
//!
//! A position is one of the [GeoJsonCoordinates] implementations. The
//! composite types group positions into line strings, rings, polygons and
//! multi-polygons and check their shape on construction.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

use crate::{GeoJsonError, GeoJsonResult};

/// A single GeoJSON position.
///
/// Positions are encoded as arrays of doubles, one per dimension.
pub trait GeoJsonCoordinates: Debug + Clone + PartialEq + Send + Sync + 'static {
    /// Number of values in an encoded position.
    const DIMENSIONS: usize;

    /// The position's values in encoding order.
    fn values(&self) -> Vec<f64>;

    /// Builds a position from exactly [Self::DIMENSIONS] values.
    fn from_values(values: &[f64]) -> GeoJsonResult<Self>;
}

fn check_dimensions(values: &[f64], expected: usize, name: &str) -> GeoJsonResult<()> {
    if values.len() != expected {
        log::error!(
            "{} requires {} values, found {}",
            name,
            expected,
            values.len()
        );
        return Err(GeoJsonError::InvalidCoordinates(format!(
            "{} requires {} values, found {}",
            name,
            expected,
            values.len()
        )));
    }
    Ok(())
}

/// A projected 2D position (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoJson2DCoordinates {
    pub x: f64,
    pub y: f64,
}

impl GeoJson2DCoordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl GeoJsonCoordinates for GeoJson2DCoordinates {
    const DIMENSIONS: usize = 2;

    fn values(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }

    fn from_values(values: &[f64]) -> GeoJsonResult<Self> {
        check_dimensions(values, Self::DIMENSIONS, "GeoJson2DCoordinates")?;
        Ok(Self::new(values[0], values[1]))
    }
}

impl Display for GeoJson2DCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// A projected 3D position (x, y, z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoJson3DCoordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeoJson3DCoordinates {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl GeoJsonCoordinates for GeoJson3DCoordinates {
    const DIMENSIONS: usize = 3;

    fn values(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }

    fn from_values(values: &[f64]) -> GeoJsonResult<Self> {
        check_dimensions(values, Self::DIMENSIONS, "GeoJson3DCoordinates")?;
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl Display for GeoJson3DCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A geographic 2D position.
///
/// Encoded longitude first, as GeoJSON requires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoJson2DGeographicCoordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoJson2DGeographicCoordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl GeoJsonCoordinates for GeoJson2DGeographicCoordinates {
    const DIMENSIONS: usize = 2;

    fn values(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }

    fn from_values(values: &[f64]) -> GeoJsonResult<Self> {
        check_dimensions(values, Self::DIMENSIONS, "GeoJson2DGeographicCoordinates")?;
        Ok(Self::new(values[0], values[1]))
    }
}

impl Display for GeoJson2DGeographicCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}

/// Positions of a line string; at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonLineStringCoordinates<C> {
    positions: Vec<C>,
}

impl<C: GeoJsonCoordinates> GeoJsonLineStringCoordinates<C> {
    pub fn new(positions: Vec<C>) -> GeoJsonResult<Self> {
        if positions.len() < 2 {
            log::error!("A line string must have at least 2 positions, found {}", positions.len());
            return Err(GeoJsonError::InvalidGeometry(format!(
                "A line string must have at least 2 positions, found {}",
                positions.len()
            )));
        }
        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[C] {
        &self.positions
    }
}

/// Positions of a closed ring: at least four, first equal to last.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonLinearRingCoordinates<C> {
    positions: Vec<C>,
}

impl<C: GeoJsonCoordinates> GeoJsonLinearRingCoordinates<C> {
    pub fn new(positions: Vec<C>) -> GeoJsonResult<Self> {
        if positions.len() < 4 {
            log::error!("A linear ring must have at least 4 positions, found {}", positions.len());
            return Err(GeoJsonError::InvalidGeometry(format!(
                "A linear ring must have at least 4 positions, found {}",
                positions.len()
            )));
        }
        if positions.first() != positions.last() {
            log::error!("The first and last positions of a linear ring must be equal");
            return Err(GeoJsonError::InvalidGeometry(
                "The first and last positions of a linear ring must be equal".to_string(),
            ));
        }
        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[C] {
        &self.positions
    }
}

/// Positions of a multi-point; may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonMultiPointCoordinates<C> {
    positions: Vec<C>,
}

impl<C: GeoJsonCoordinates> GeoJsonMultiPointCoordinates<C> {
    pub fn new(positions: Vec<C>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[C] {
        &self.positions
    }
}

/// An exterior ring and zero or more holes.
///
/// Encoded as one array of rings, exterior first.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPolygonCoordinates<C> {
    exterior: GeoJsonLinearRingCoordinates<C>,
    holes: Vec<GeoJsonLinearRingCoordinates<C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonPolygonCoordinates<C> {
    pub fn new(exterior: GeoJsonLinearRingCoordinates<C>) -> Self {
        Self::with_holes(exterior, Vec::new())
    }

    pub fn with_holes(
        exterior: GeoJsonLinearRingCoordinates<C>,
        holes: Vec<GeoJsonLinearRingCoordinates<C>>,
    ) -> Self {
        Self { exterior, holes }
    }

    /// Splits `rings` into the exterior (first) and holes (rest).
    pub fn from_rings(rings: Vec<GeoJsonLinearRingCoordinates<C>>) -> GeoJsonResult<Self> {
        let mut rings = rings.into_iter();
        match rings.next() {
            Some(exterior) => Ok(Self::with_holes(exterior, rings.collect())),
            None => {
                log::error!("A polygon must have an exterior ring");
                Err(GeoJsonError::InvalidGeometry(
                    "A polygon must have an exterior ring".to_string(),
                ))
            }
        }
    }

    pub fn exterior(&self) -> &GeoJsonLinearRingCoordinates<C> {
        &self.exterior
    }

    pub fn holes(&self) -> &[GeoJsonLinearRingCoordinates<C>] {
        &self.holes
    }

    /// The exterior followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &GeoJsonLinearRingCoordinates<C>> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonMultiPolygonCoordinates<C> {
    polygons: Vec<GeoJsonPolygonCoordinates<C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonMultiPolygonCoordinates<C> {
    pub fn new(polygons: Vec<GeoJsonPolygonCoordinates<C>>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[GeoJsonPolygonCoordinates<C>] {
        &self.polygons
    }
}

/// Minimum and maximum corners of a geometry's extent.
///
/// Encoded as one flat array: all minimum values, then all maximum values.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonBoundingBox<C> {
    min: C,
    max: C,
}

impl<C: GeoJsonCoordinates> GeoJsonBoundingBox<C> {
    pub fn new(min: C, max: C) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> &C {
        &self.min
    }

    pub fn max(&self) -> &C {
        &self.max
    }

    pub fn values(&self) -> Vec<f64> {
        let mut values = self.min.values();
        values.extend(self.max.values());
        values
    }

    pub fn from_values(values: &[f64]) -> GeoJsonResult<Self> {
        check_dimensions(values, 2 * C::DIMENSIONS, "GeoJsonBoundingBox")?;
        let (min, max) = values.split_at(C::DIMENSIONS);
        Ok(Self::new(C::from_values(min)?, C::from_values(max)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(x: f64, y: f64) -> GeoJson2DCoordinates {
        GeoJson2DCoordinates::new(x, y)
    }

    #[test]
    fn test_from_values_checks_dimensions() {
        assert_eq!(GeoJson3DCoordinates::from_values(&[1.0, 2.0, 3.0]).unwrap().z, 3.0);
        assert!(matches!(
            GeoJson2DCoordinates::from_values(&[1.0]),
            Err(GeoJsonError::InvalidCoordinates(_))
        ));
        let geo = GeoJson2DGeographicCoordinates::from_values(&[-73.9, 40.7]).unwrap();
        assert_eq!(geo.longitude, -73.9);
        assert_eq!(geo.values(), vec![-73.9, 40.7]);
    }

    #[test]
    fn test_line_string_needs_two_positions() {
        assert!(GeoJsonLineStringCoordinates::new(vec![xy(0.0, 0.0)]).is_err());
        let line = GeoJsonLineStringCoordinates::new(vec![xy(0.0, 0.0), xy(1.0, 1.0)]).unwrap();
        assert_eq!(line.positions().len(), 2);
    }

    #[test]
    fn test_linear_ring_must_be_closed() {
        let open = vec![xy(0.0, 0.0), xy(0.0, 1.0), xy(1.0, 1.0), xy(1.0, 0.0)];
        assert!(matches!(
            GeoJsonLinearRingCoordinates::new(open),
            Err(GeoJsonError::InvalidGeometry(_))
        ));

        let short = vec![xy(0.0, 0.0), xy(1.0, 1.0), xy(0.0, 0.0)];
        assert!(GeoJsonLinearRingCoordinates::new(short).is_err());

        let closed = vec![xy(0.0, 0.0), xy(0.0, 1.0), xy(1.0, 1.0), xy(0.0, 0.0)];
        assert_eq!(GeoJsonLinearRingCoordinates::new(closed).unwrap().positions().len(), 4);
    }

    #[test]
    fn test_polygon_rings() {
        let ring = GeoJsonLinearRingCoordinates::new(vec![
            xy(0.0, 0.0),
            xy(0.0, 4.0),
            xy(4.0, 4.0),
            xy(0.0, 0.0),
        ])
        .unwrap();
        let hole = GeoJsonLinearRingCoordinates::new(vec![
            xy(1.0, 1.0),
            xy(1.0, 2.0),
            xy(2.0, 2.0),
            xy(1.0, 1.0),
        ])
        .unwrap();

        let polygon = GeoJsonPolygonCoordinates::from_rings(vec![ring.clone(), hole.clone()]).unwrap();
        assert_eq!(polygon.exterior(), &ring);
        assert_eq!(polygon.holes(), &[hole]);
        assert_eq!(polygon.rings().count(), 2);

        assert!(GeoJsonPolygonCoordinates::<GeoJson2DCoordinates>::from_rings(vec![]).is_err());
    }

    #[test]
    fn test_bounding_box_values() {
        let bbox = GeoJsonBoundingBox::new(xy(0.0, 1.0), xy(2.0, 3.0));
        assert_eq!(bbox.values(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(GeoJsonBoundingBox::from_values(&bbox.values()).unwrap(), bbox);
        assert!(GeoJsonBoundingBox::<GeoJson2DCoordinates>::from_values(&[0.0, 1.0, 2.0]).is_err());
    }
}
