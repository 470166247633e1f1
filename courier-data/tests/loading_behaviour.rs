//! Behavioural tests for loading street maps and deliveries from files.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use courier_core::StreetMap;
use courier_data::{
    DeliveriesError, DeliveryManifest, MapLoadError, load_deliveries, load_street_map,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const MAP_TEXT: &str = "\
Broxton Avenue
2
34.0625329 -118.4470263 34.0632405 -118.4470467
34.0632405 -118.4470467 34.0636100 -118.4470807
Weyburn Avenue
1
34.0625329 -118.4470263 34.0625800 -118.4480000
";

const DELIVERIES_TEXT: &str = "\
34.0625329 -118.4470263
34.0636100 -118.4470807:Chicken tenders
34.0625800 -118.4480000:B-Plate salmon
";

#[derive(Debug)]
struct LoadingWorld {
    dir: TempDir,
    path: RefCell<Option<Utf8PathBuf>>,
    map: RefCell<Option<Result<StreetMap, MapLoadError>>>,
    deliveries: RefCell<Option<Result<DeliveryManifest, DeliveriesError>>>,
}

impl LoadingWorld {
    fn write(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        self.path
            .replace(Some(Utf8PathBuf::from_path_buf(path).expect("UTF-8 temp path")));
    }

    fn path(&self) -> Utf8PathBuf {
        self.path.borrow().clone().expect("path should be chosen first")
    }
}

#[fixture]
fn world() -> LoadingWorld {
    LoadingWorld {
        dir: tempfile::tempdir().expect("temp dir"),
        path: RefCell::new(None),
        map: RefCell::new(None),
        deliveries: RefCell::new(None),
    }
}

#[given("a street map file describing Broxton and Weyburn Avenues")]
fn given_map_file(world: &LoadingWorld) {
    world.write("mapdata.txt", MAP_TEXT);
}

#[given("a deliveries file with a depot and two stops")]
fn given_deliveries_file(world: &LoadingWorld) {
    world.write("deliveries.txt", DELIVERIES_TEXT);
}

#[given("no file at the requested path")]
fn given_missing_file(world: &LoadingWorld) {
    let path = world.dir.path().join("missing.txt");
    world
        .path
        .replace(Some(Utf8PathBuf::from_path_buf(path).expect("UTF-8 temp path")));
}

#[when("I load the street map")]
fn when_load_map(world: &LoadingWorld) {
    world.map.replace(Some(load_street_map(&world.path())));
}

#[when("I load the deliveries")]
fn when_load_deliveries(world: &LoadingWorld) {
    world.deliveries.replace(Some(load_deliveries(&world.path())));
}

#[then("the map holds 4 vertices and 6 directed segments")]
fn then_map_counts(world: &LoadingWorld) {
    let outcome = world.map.borrow();
    let map = outcome
        .as_ref()
        .expect("map loaded")
        .as_ref()
        .expect("valid map");
    assert_eq!(map.vertex_count(), 4);
    assert_eq!(map.segment_count(), 6);
}

#[then("the manifest lists Chicken tenders then B-Plate salmon")]
fn then_manifest_items(world: &LoadingWorld) {
    let outcome = world.deliveries.borrow();
    let manifest = outcome
        .as_ref()
        .expect("deliveries loaded")
        .as_ref()
        .expect("valid deliveries");
    let items: Vec<_> = manifest.stops.iter().map(|stop| stop.item.as_str()).collect();
    assert_eq!(items, ["Chicken tenders", "B-Plate salmon"]);
    assert_eq!(manifest.depot.to_string(), "34.0625329 -118.4470263");
}

#[then("loading fails because the file cannot be opened")]
fn then_open_fails(world: &LoadingWorld) {
    let outcome = world.map.borrow();
    let result = outcome.as_ref().expect("map load attempted");
    assert!(matches!(result, Err(MapLoadError::Open { .. })));
}

#[scenario(path = "tests/features/loading.feature", index = 0)]
fn loading_street_map(world: LoadingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/loading.feature", index = 1)]
fn loading_deliveries(world: LoadingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/loading.feature", index = 2)]
fn loading_missing_file(world: LoadingWorld) {
    let _ = world;
}
