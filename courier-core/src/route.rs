//! Routes along streets.
//!
//! A [`Route`] is a contiguous walk of street segments with its total
//! great-circle length. [`RouteFinder`] is the seam between the planner and
//! whatever computes point-to-point routes.

use thiserror::Error;

use crate::{Coordinate, StreetSegment};

/// An ordered walk along street segments.
///
/// Consecutive segments share an endpoint: `segments[i].end ==
/// segments[i + 1].start`.
///
/// # Examples
/// ```
/// use courier_core::Route;
///
/// let route = Route::empty();
/// assert!(route.is_empty());
/// assert_eq!(route.distance_miles(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    segments: Vec<StreetSegment>,
    distance_miles: f64,
}

impl Route {
    /// Construct a route from segments, summing their lengths.
    pub fn new(segments: Vec<StreetSegment>) -> Self {
        let distance_miles = segments.iter().map(StreetSegment::length_miles).sum();
        Self {
            segments,
            distance_miles,
        }
    }

    /// A route that goes nowhere.
    pub const fn empty() -> Self {
        Self {
            segments: Vec::new(),
            distance_miles: 0.0,
        }
    }

    /// Segments in travel order.
    pub fn segments(&self) -> &[StreetSegment] {
        &self.segments
    }

    /// Total length in miles.
    pub const fn distance_miles(&self) -> f64 {
        self.distance_miles
    }

    /// Whether the route has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether every segment starts where the previous one ended.
    pub fn is_contiguous(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.end == b.start))
    }

    /// Consume the route, returning its segments.
    pub fn into_segments(self) -> Vec<StreetSegment> {
        self.segments
    }
}

/// Errors from [`RouteFinder::find_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A route endpoint has no outgoing street segments.
    #[error("coordinate {coordinate} is not on the street map")]
    UnknownCoordinate {
        /// The offending endpoint.
        coordinate: Coordinate,
    },
    /// Every reachable street was explored without reaching the target.
    #[error("no route from {from} to {to}")]
    NoRoute {
        /// Route origin.
        from: Coordinate,
        /// Route destination.
        to: Coordinate,
    },
}

/// Compute least-cost routes between two coordinates.
///
/// Implementations return an empty route when `start == end`, and must not
/// retry failures internally.
pub trait RouteFinder {
    /// Find a route from `start` to `end`.
    fn find_route(&self, start: &Coordinate, end: &Coordinate) -> Result<Route, RouteError>;

    /// Whether `coordinate` can be used as a route endpoint.
    fn is_known(&self, coordinate: &Coordinate) -> bool;
}
