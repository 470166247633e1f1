//! Street graph access.
//!
//! The [`StreetGraph`] trait is the read-only view the router needs: the
//! segments leaving a coordinate. [`StreetMap`] is the in-memory
//! implementation built once at load time.

use crate::{AssociativeIndex, Coordinate, StreetSegment};

/// Read-only adjacency queries over a street network.
///
/// # Examples
///
/// ```rust
/// use courier_core::{Coordinate, StreetGraph, StreetMap};
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let a = Coordinate::new("34.0", "-118.0")?;
/// let b = Coordinate::new("34.0", "-118.001")?;
/// let mut map = StreetMap::new();
/// map.add_street("Strathmore Drive", a.clone(), b.clone());
///
/// let leaving_a = map.segments_starting_at(&a).unwrap_or_default();
/// assert_eq!(leaving_a.len(), 1);
/// assert_eq!(leaving_a[0].end, b);
/// assert!(map.segments_starting_at(&Coordinate::new("1", "1")?).is_none());
/// # Ok(())
/// # }
/// ```
pub trait StreetGraph {
    /// Segments whose start is `at`, or `None` when `at` is not a vertex.
    fn segments_starting_at(&self, at: &Coordinate) -> Option<&[StreetSegment]>;

    /// Whether `at` is a vertex of the graph.
    fn contains(&self, at: &Coordinate) -> bool {
        self.segments_starting_at(at).is_some()
    }
}

impl<G: StreetGraph + ?Sized> StreetGraph for &G {
    fn segments_starting_at(&self, at: &Coordinate) -> Option<&[StreetSegment]> {
        (**self).segments_starting_at(at)
    }
}

/// In-memory street graph keyed by coordinate.
///
/// Every street segment is stored under both of its endpoints, once per
/// direction of travel.
#[derive(Debug, Clone, Default)]
pub struct StreetMap {
    adjacency: AssociativeIndex<Coordinate, Vec<StreetSegment>>,
    segment_count: usize,
}

impl StreetMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a street segment between `start` and `end` in both directions.
    pub fn add_street(&mut self, name: impl Into<String>, start: Coordinate, end: Coordinate) {
        let forward = StreetSegment::new(start, end, name);
        let backward = forward.reversed();
        self.insert(forward);
        self.insert(backward);
    }

    fn insert(&mut self, segment: StreetSegment) {
        self.adjacency
            .find_or_insert_with(segment.start.clone(), Vec::new)
            .push(segment);
        self.segment_count += 1;
    }

    /// Number of distinct coordinates with at least one outgoing segment.
    pub const fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed segments, twice the number of street segments added.
    pub const fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Whether no segments have been added.
    pub const fn is_empty(&self) -> bool {
        self.segment_count == 0
    }

    /// Iterate over every vertex in unspecified order.
    pub fn vertices(&self) -> impl Iterator<Item = &Coordinate> {
        self.adjacency.keys()
    }
}

impl StreetGraph for StreetMap {
    fn segments_starting_at(&self, at: &Coordinate) -> Option<&[StreetSegment]> {
        self.adjacency.find(at).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn coordinate(latitude: &str, longitude: &str) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[fixture]
    fn junction() -> StreetMap {
        let centre = coordinate("34.0", "-118.0");
        let mut map = StreetMap::new();
        map.add_street("Hilgard Avenue", centre.clone(), coordinate("34.001", "-118.0"));
        map.add_street("Hilgard Avenue", centre.clone(), coordinate("33.999", "-118.0"));
        map.add_street("Le Conte Avenue", centre, coordinate("34.0", "-118.001"));
        map
    }

    #[rstest]
    fn segments_are_stored_both_ways(junction: StreetMap) {
        assert_eq!(junction.vertex_count(), 4);
        assert_eq!(junction.segment_count(), 6);
        let leaf = coordinate("34.0", "-118.001");
        let back = junction
            .segments_starting_at(&leaf)
            .expect("leaf is a vertex");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].end, coordinate("34.0", "-118.0"));
        assert_eq!(back[0].name, "Le Conte Avenue");
    }

    #[rstest]
    fn junction_lists_every_outgoing_segment(junction: StreetMap) {
        let centre = coordinate("34.0", "-118.0");
        let leaving = junction
            .segments_starting_at(&centre)
            .expect("centre is a vertex");
        assert_eq!(leaving.len(), 3);
        assert!(leaving.iter().all(|segment| segment.start == centre));
    }

    #[rstest]
    fn unknown_coordinate_is_not_found(junction: StreetMap) {
        let elsewhere = coordinate("40.0", "-100.0");
        assert!(junction.segments_starting_at(&elsewhere).is_none());
        assert!(!junction.contains(&elsewhere));
    }

    #[rstest]
    fn debug_output_names_streets(junction: StreetMap) {
        let rendered = format!("{junction:?}");
        assert!(rendered.starts_with("StreetMap"));
        assert!(rendered.contains("Le Conte Avenue"));
        assert!(rendered.contains("segment_count: 6"));
    }

    #[rstest]
    fn borrowed_graph_delegates(junction: StreetMap) {
        fn knows<G: StreetGraph>(graph: G, at: &Coordinate) -> bool {
            graph.contains(at)
        }
        assert!(knows(&junction, &coordinate("34.001", "-118.0")));
    }
}
