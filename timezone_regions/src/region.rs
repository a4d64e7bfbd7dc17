use geo_types::{Coord, LineString};
use itertools::Itertools;
use shared_kernel::non_empty_string;
use thiserror::Error;

non_empty_string!(TimezoneId);

/// A point as `x = longitude`, `y = latitude`.
pub type Coordinate = Coord<f64>;

// Signed zeroes collapse so that `0.0` and `-0.0` count as one point.
fn distinct_key(point: &Coordinate) -> (u64, u64) {
    ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPolygon {
    #[error("polygon ring needs at least {} distinct points, found {found}", PolygonRing::MIN_DISTINCT_POINTS)]
    TooFewDistinctPoints { found: usize },
    #[error("coordinate at position {position} is not a finite number")]
    NonFiniteCoordinate { position: usize },
}

/// The single outer ring of a polygon, points kept exactly as given.
/// Unlike `geo_types::Polygon`, the ring is never closed implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRing(LineString<f64>);

impl PolygonRing {
    pub const MIN_DISTINCT_POINTS: usize = 3;

    pub fn points(&self) -> &[Coordinate] {
        &self.0 .0
    }
}

impl TryFrom<Vec<Coordinate>> for PolygonRing {
    type Error = InvalidPolygon;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        if let Some(position) = points
            .iter()
            .position(|point| !(point.x.is_finite() && point.y.is_finite()))
        {
            return Err(InvalidPolygon::NonFiniteCoordinate { position });
        }

        let found = points
            .iter()
            .unique_by(|point| distinct_key(point))
            .take(Self::MIN_DISTINCT_POINTS)
            .count();
        if found < Self::MIN_DISTINCT_POINTS {
            return Err(InvalidPolygon::TooFewDistinctPoints { found });
        }

        Ok(Self(LineString::new(points)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneRegion {
    pub timezone_id: TimezoneId,
    pub polygon: PolygonRing,
}
