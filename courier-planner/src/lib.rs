//! Delivery route planning for courier.
//!
//! This crate provides [`RoutePlanner`], the default implementation of the
//! [`Planner`](courier_core::Planner) trait. It reorders stops with a
//! seeded simulated-annealing [`TourOptimizer`], routes each leg with the
//! [`AStarRouter`] and folds the resulting street segments into
//! turn-by-turn commands.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod fold;
mod optimizer;
mod planner;
mod router;

pub use optimizer::{
    AnnealingConfig, AnnealingConfigError, OptimizedTour, TourOptimizer, crow_distance,
};
pub use planner::{
    DEFAULT_TURN_TOLERANCE_DEGREES, PlannerConfigError, RoutePlanner, RoutePlannerConfig,
};
pub use router::AStarRouter;
