//! Core domain types for the courier route planner.
//!
//! Coordinates, street segments and the street map live here together with
//! the chained [`AssociativeIndex`] that backs them. The routing and
//! planning traits are defined here so that solvers and front ends can be
//! swapped independently.

#![forbid(unsafe_code)]

mod command;
mod coordinate;
pub mod geometry;
mod graph;
mod index;
mod plan;
mod route;
mod segment;
mod stop;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use command::{CompassDirection, NavigationCommand, TurnDirection};
pub use coordinate::{Coordinate, CoordinateError};
pub use graph::{StreetGraph, StreetMap};
pub use index::{AssociativeIndex, DEFAULT_MAX_LOAD_FACTOR, LoadFactorError, MIN_BUCKETS};
pub use plan::{DeliveryPlan, Diagnostics, PlanError, PlanRequest, Planner};
pub use route::{Route, RouteError, RouteFinder};
pub use segment::StreetSegment;
pub use stop::DeliveryStop;
