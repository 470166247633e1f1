//! A* point-to-point routing over a [`StreetGraph`].
//!
//! Search state lives in [`AssociativeIndex`] maps created per call: best
//! known travelled distance (`g`), estimated total (`f`) and the segment each
//! vertex was last reached by. The straight-line distance to the target is
//! the heuristic, which never overestimates along streets.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use courier_core::geometry::distance_miles;
use courier_core::{
    AssociativeIndex, Coordinate, Route, RouteError, RouteFinder, StreetGraph, StreetSegment,
};
use log::debug;

/// Frontier entry ordered so that `BinaryHeap` pops the smallest `f` first.
///
/// Equal estimates fall back to insertion order; callers must not rely on
/// any particular tie-break.
#[derive(Debug)]
struct Frontier {
    estimate: f64,
    sequence: u64,
    vertex: Coordinate,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Per-call search bookkeeping.
#[derive(Default)]
struct SearchState {
    travelled: AssociativeIndex<Coordinate, f64>,
    estimated: AssociativeIndex<Coordinate, f64>,
    arrived_by: AssociativeIndex<Coordinate, StreetSegment>,
    open: BinaryHeap<Frontier>,
    pushed: u64,
    expanded: usize,
}

impl SearchState {
    fn admit(&mut self, vertex: Coordinate, travelled: f64, estimate: f64) {
        self.travelled.associate(vertex.clone(), travelled);
        self.estimated.associate(vertex.clone(), estimate);
        self.pushed += 1;
        self.open.push(Frontier {
            estimate,
            sequence: self.pushed,
            vertex,
        });
    }

    /// Whether a popped entry has been superseded by a cheaper one.
    fn is_stale(&self, entry: &Frontier) -> bool {
        self.estimated
            .find(&entry.vertex)
            .is_some_and(|best| entry.estimate > *best)
    }
}

/// Least-distance router using A* search.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, RouteFinder, StreetMap};
/// use courier_planner::AStarRouter;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let a = Coordinate::new("34.0", "-118.0")?;
/// let b = Coordinate::new("34.0", "-118.001")?;
/// let c = Coordinate::new("34.001", "-118.001")?;
/// let mut map = StreetMap::new();
/// map.add_street("Weyburn Avenue", a.clone(), b.clone());
/// map.add_street("Broxton Avenue", b, c.clone());
///
/// let router = AStarRouter::new(&map);
/// let route = router.find_route(&a, &c)?;
/// assert_eq!(route.segments().len(), 2);
/// assert!(route.is_contiguous());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AStarRouter<G> {
    graph: G,
}

impl<G: StreetGraph> AStarRouter<G> {
    /// Route over `graph`.
    pub const fn new(graph: G) -> Self {
        Self { graph }
    }

    /// The graph being searched.
    #[must_use]
    pub const fn graph(&self) -> &G {
        &self.graph
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "path costs and heuristics are floating-point miles"
    )]
    fn search(&self, start: &Coordinate, end: &Coordinate) -> Result<Route, RouteError> {
        let mut state = SearchState::default();
        state.admit(start.clone(), 0.0, distance_miles(start, end));

        while let Some(entry) = state.open.pop() {
            if state.is_stale(&entry) {
                continue;
            }
            if entry.vertex == *end {
                let route = reconstruct(&state.arrived_by, start, end);
                debug!(
                    "routed {start} -> {end}: {} segments, {:.3} miles, {} vertices expanded",
                    route.segments().len(),
                    route.distance_miles(),
                    state.expanded
                );
                return Ok(route);
            }
            state.expanded += 1;
            let travelled = state.travelled.find(&entry.vertex).copied().unwrap_or(0.0);
            let Some(segments) = self.graph.segments_starting_at(&entry.vertex) else {
                continue;
            };
            for segment in segments {
                let tentative = travelled + segment.length_miles();
                let improves = state
                    .travelled
                    .find(&segment.end)
                    .is_none_or(|known| tentative < *known);
                if improves {
                    let estimate = tentative + distance_miles(&segment.end, end);
                    state
                        .arrived_by
                        .associate(segment.end.clone(), segment.clone());
                    state.admit(segment.end.clone(), tentative, estimate);
                }
            }
        }

        debug!(
            "no route {start} -> {end} after expanding {} vertices",
            state.expanded
        );
        Err(RouteError::NoRoute {
            from: start.clone(),
            to: end.clone(),
        })
    }
}

/// Walk arrival segments back from `end` to `start`.
fn reconstruct(
    arrived_by: &AssociativeIndex<Coordinate, StreetSegment>,
    start: &Coordinate,
    end: &Coordinate,
) -> Route {
    let mut segments = Vec::new();
    let mut at = end;
    while at != start {
        let Some(segment) = arrived_by.find(at) else {
            break;
        };
        segments.push(segment.clone());
        at = &segment.start;
    }
    segments.reverse();
    Route::new(segments)
}

impl<G: StreetGraph> RouteFinder for AStarRouter<G> {
    fn find_route(&self, start: &Coordinate, end: &Coordinate) -> Result<Route, RouteError> {
        if start == end {
            return Ok(Route::empty());
        }
        for endpoint in [start, end] {
            if !self.graph.contains(endpoint) {
                return Err(RouteError::UnknownCoordinate {
                    coordinate: endpoint.clone(),
                });
            }
        }
        self.search(start, end)
    }

    fn is_known(&self, coordinate: &Coordinate) -> bool {
        self.graph.contains(coordinate)
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating-point distances"
)]
mod tests {
    use super::*;
    use courier_core::StreetMap;
    use courier_core::test_support::{GridMap, coordinate};
    use rstest::{fixture, rstest};

    #[fixture]
    fn grid() -> GridMap {
        GridMap::new(4, 4)
    }

    #[rstest]
    fn same_endpoint_is_empty_route(grid: GridMap) {
        let router = AStarRouter::new(grid.map());
        let corner = grid.intersection(0, 0);
        let route = router.find_route(&corner, &corner).expect("trivial route");
        assert!(route.is_empty());
        assert!(route.distance_miles().abs() < f64::EPSILON);
    }

    #[rstest]
    fn unknown_endpoints_are_reported(grid: GridMap) {
        let router = AStarRouter::new(grid.map());
        let inside = grid.intersection(1, 1);
        let outside = grid.intersection(9, 9);
        assert_eq!(
            router.find_route(&outside, &inside),
            Err(RouteError::UnknownCoordinate {
                coordinate: outside.clone()
            })
        );
        assert_eq!(
            router.find_route(&inside, &outside),
            Err(RouteError::UnknownCoordinate {
                coordinate: outside.clone()
            })
        );
        assert!(router.is_known(&inside));
        assert!(!router.is_known(&outside));
    }

    #[rstest]
    fn grid_route_is_manhattan_shortest(grid: GridMap) {
        let router = AStarRouter::new(grid.map());
        let from = grid.intersection(0, 0);
        let to = grid.intersection(3, 2);
        let route = router.find_route(&from, &to).expect("connected grid");
        assert_eq!(route.segments().len(), 5);
        assert!(route.is_contiguous());
        assert_eq!(route.segments().first().map(|s| &s.start), Some(&from));
        assert_eq!(route.segments().last().map(|s| &s.end), Some(&to));
        let summed: f64 = route.segments().iter().map(StreetSegment::length_miles).sum();
        assert!((route.distance_miles() - summed).abs() < 1e-12);
    }

    #[rstest]
    fn prefers_shorter_detour() {
        // Two ways from a to d: a long straight street and a short dog-leg.
        let a = coordinate("34.0000", "-118.0000");
        let b = coordinate("34.0000", "-118.0010");
        let c = coordinate("34.0005", "-118.0020");
        let d = coordinate("34.0000", "-118.0020");
        let far = coordinate("34.0100", "-118.0010");
        let mut map = StreetMap::new();
        map.add_street("Short Street", a.clone(), b.clone());
        map.add_street("Short Street", b.clone(), d.clone());
        map.add_street("Long Road", a.clone(), far.clone());
        map.add_street("Long Road", far, c.clone());
        map.add_street("Long Road", c, d.clone());

        let route = AStarRouter::new(&map).find_route(&a, &d).expect("connected");
        let names: Vec<_> = route.segments().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Short Street", "Short Street"]);
    }

    #[rstest]
    fn disconnected_islands_have_no_route() {
        let mut map = StreetMap::new();
        let a = coordinate("34.0", "-118.0");
        let b = coordinate("34.0", "-118.001");
        let x = coordinate("35.0", "-118.0");
        let y = coordinate("35.0", "-118.001");
        map.add_street("Island Way", a.clone(), b);
        map.add_street("Faraway Lane", x, y.clone());
        let result = AStarRouter::new(&map).find_route(&a, &y);
        assert_eq!(result, Err(RouteError::NoRoute { from: a, to: y }));
    }

    #[rstest]
    fn unique_path_matches_segment_sum() {
        let points = [
            coordinate("34.0000", "-118.0000"),
            coordinate("34.0010", "-118.0000"),
            coordinate("34.0010", "-118.0015"),
            coordinate("34.0030", "-118.0015"),
        ];
        let mut map = StreetMap::new();
        let mut expected = 0.0;
        for pair in points.windows(2) {
            if let [from, to] = pair {
                map.add_street("Path", from.clone(), to.clone());
                expected += distance_miles(from, to);
            }
        }
        let [first, .., last] = &points;
        let route = AStarRouter::new(&map).find_route(first, last).expect("path");
        assert_eq!(route.segments().len(), 3);
        assert!((route.distance_miles() - expected).abs() < 1e-12);
    }

    #[rstest]
    fn frontier_pops_smallest_estimate_first() {
        let vertex = coordinate("1", "1");
        let mut open = BinaryHeap::new();
        for (sequence, estimate) in [(1, 3.0), (2, 1.0), (3, 2.0)] {
            open.push(Frontier {
                estimate,
                sequence,
                vertex: vertex.clone(),
            });
        }
        let order: Vec<_> = std::iter::from_fn(|| open.pop().map(|f| f.sequence)).collect();
        assert_eq!(order, [2, 3, 1]);
    }
}
