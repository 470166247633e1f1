//! File loading for the courier route planner.
//!
//! Responsibilities:
//! - Parse the street map file into a [`StreetMap`](courier_core::StreetMap).
//! - Parse the deliveries file into a depot and its stops.
//! - Open files through `cap-std` using UTF-8 paths.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `courier-core` and `courier-planner`).
//!
//! Every loader has a reader-based `parse_*` form and a path-based `load_*`
//! form.

#![forbid(unsafe_code)]

mod deliveries;
pub mod fs;
mod lines;
mod street_map;

pub use deliveries::{DeliveriesError, DeliveryManifest, load_deliveries, parse_deliveries};
pub use street_map::{MapLoadError, load_street_map, parse_street_map};
