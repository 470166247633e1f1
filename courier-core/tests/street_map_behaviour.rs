//! Behavioural tests for building and querying the street map.

use std::cell::RefCell;

use courier_core::{Coordinate, StreetGraph, StreetMap, StreetSegment};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct MapWorld {
    map: RefCell<StreetMap>,
    centre: RefCell<Option<Coordinate>>,
    lookup: RefCell<Option<Option<Vec<StreetSegment>>>>,
}

impl MapWorld {
    fn look_up(&self, at: &Coordinate) {
        let found = self
            .map
            .borrow()
            .segments_starting_at(at)
            .map(<[StreetSegment]>::to_vec);
        self.lookup.replace(Some(found));
    }

    fn found_segments(&self) -> Vec<StreetSegment> {
        self.lookup
            .borrow()
            .clone()
            .expect("lookup should run before assertions")
            .expect("coordinate should be a vertex")
    }
}

fn coordinate(latitude: &str, longitude: &str) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("valid coordinate")
}

fn north() -> Coordinate {
    coordinate("34.0700", "-118.4410")
}

fn south() -> Coordinate {
    coordinate("34.0690", "-118.4410")
}

#[fixture]
fn world() -> MapWorld {
    MapWorld::default()
}

#[given("a street map with Hilgard Avenue between two intersections")]
fn given_single_street(world: &MapWorld) {
    let mut map = StreetMap::new();
    map.add_street("Hilgard Avenue", south(), north());
    world.map.replace(map);
}

#[given("a crossroads of Hilgard Avenue and Le Conte Avenue")]
fn given_crossroads(world: &MapWorld) {
    let centre = coordinate("34.0630", "-118.4450");
    let mut map = StreetMap::new();
    map.add_street("Hilgard Avenue", centre.clone(), coordinate("34.0640", "-118.4450"));
    map.add_street("Hilgard Avenue", centre.clone(), coordinate("34.0620", "-118.4450"));
    map.add_street("Le Conte Avenue", centre.clone(), coordinate("34.0630", "-118.4440"));
    map.add_street("Le Conte Avenue", centre.clone(), coordinate("34.0630", "-118.4460"));
    world.centre.replace(Some(centre));
    world.map.replace(map);
}

#[when("I look up the segments leaving the northern intersection")]
fn when_lookup_north(world: &MapWorld) {
    world.look_up(&north());
}

#[when("I look up the segments leaving an unmapped coordinate")]
fn when_lookup_unmapped(world: &MapWorld) {
    world.look_up(&coordinate("40.0", "-100.0"));
}

#[when("I look up the segments leaving the centre of the crossroads")]
fn when_lookup_centre(world: &MapWorld) {
    let centre = world.centre.borrow().clone().expect("crossroads built");
    world.look_up(&centre);
}

#[then("one segment on Hilgard Avenue is returned")]
fn then_single_segment(world: &MapWorld) {
    let segments = world.found_segments();
    assert_eq!(segments.len(), 1);
    assert!(segments.iter().all(|segment| segment.name == "Hilgard Avenue"));
}

#[then("it ends at the southern intersection")]
fn then_ends_south(world: &MapWorld) {
    let segments = world.found_segments();
    assert!(segments.iter().all(|segment| segment.end == south()));
}

#[then("the coordinate is reported as unknown")]
fn then_unknown(world: &MapWorld) {
    assert_eq!(*world.lookup.borrow(), Some(None));
}

#[then("four segments are returned")]
fn then_four_segments(world: &MapWorld) {
    assert_eq!(world.found_segments().len(), 4);
}

#[then("the map holds 5 vertices and 8 directed segments")]
fn then_counts(world: &MapWorld) {
    let map = world.map.borrow();
    assert_eq!(map.vertex_count(), 5);
    assert_eq!(map.segment_count(), 8);
}

#[scenario(path = "tests/features/street_map.feature", index = 0)]
fn streets_recorded_both_ways(world: MapWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/street_map.feature", index = 1)]
fn unknown_coordinates(world: MapWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/street_map.feature", index = 2)]
fn junction_lists_streets(world: MapWorld) {
    let _ = world;
}
