//! Facade crate for the courier delivery route planner.
//!
//! This crate re-exports the core domain types and exposes the default
//! planner and the file loaders behind feature flags.

#![forbid(unsafe_code)]

pub use courier_core::{
    CompassDirection, Coordinate, CoordinateError, DeliveryPlan, DeliveryStop, Diagnostics,
    NavigationCommand, PlanError, PlanRequest, Planner, Route, RouteError, RouteFinder,
    StreetGraph, StreetMap, StreetSegment, TurnDirection,
};

#[cfg(feature = "planner")]
pub use courier_planner::{
    AStarRouter, AnnealingConfig, PlannerConfigError, RoutePlanner, RoutePlannerConfig,
    TourOptimizer,
};

#[cfg(feature = "data")]
pub use courier_data::{
    DeliveriesError, DeliveryManifest, MapLoadError, load_deliveries, load_street_map,
    parse_deliveries, parse_street_map,
};
