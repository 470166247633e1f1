use geo::Line;

use crate::Coordinate;
use crate::geometry;

/// A directed street edge between two coordinates.
///
/// Map loading records every street segment in both directions, so a graph
/// built from [`StreetSegment`] values is logically undirected.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, StreetSegment};
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let segment = StreetSegment::new(
///     Coordinate::new("34.0", "-118.0")?,
///     Coordinate::new("34.0", "-117.99")?,
///     "Le Conte Avenue",
/// );
/// assert_eq!(segment.reversed().end, segment.start);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetSegment {
    /// Vertex the segment leaves from.
    pub start: Coordinate,
    /// Vertex the segment arrives at.
    pub end: Coordinate,
    /// Street name shared by every segment of the same street.
    pub name: String,
}

impl StreetSegment {
    /// Construct a segment from `start` to `end` on street `name`.
    pub fn new(start: Coordinate, end: Coordinate, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    /// The same street segment travelled in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end.clone(), self.start.clone(), self.name.clone())
    }

    /// Great-circle length in miles.
    pub fn length_miles(&self) -> f64 {
        geometry::distance_miles(&self.start, &self.end)
    }

    /// Planar line in `(longitude, latitude)` space.
    pub const fn to_line(&self) -> Line<f64> {
        Line {
            start: self.start.to_coord(),
            end: self.end.to_coord(),
        }
    }
}
