use std::time::Duration;

use thiserror::Error;

use crate::{Coordinate, DeliveryStop, NavigationCommand, RouteError};

/// Parameters for a plan request.
///
/// The request captures the depot, the stops to deliver to and a random
/// seed so that tour optimisation is reproducible.
///
/// # Examples
/// ```rust
/// use courier_core::{Coordinate, DeliveryStop, PlanRequest};
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let request = PlanRequest {
///     depot: Coordinate::new("34.0625329", "-118.4470263")?,
///     stops: vec![DeliveryStop::new(Coordinate::new("34.0712323", "-118.4505969")?, "Sardines")],
///     seed: 7,
/// };
/// assert_eq!(request.stops.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    /// Where every tour starts and ends.
    pub depot: Coordinate,
    /// Stops to visit, in caller order.
    pub stops: Vec<DeliveryStop>,
    /// Seed for the tour optimiser's random generator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
}

/// Measurements gathered while planning.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time spent planning.
    pub plan_time: Duration,
    /// Straight-line tour length in the caller's stop order.
    pub original_crow_miles: f64,
    /// Straight-line tour length in the optimised order.
    pub optimized_crow_miles: f64,
    /// Annealing iterations performed by the tour optimiser.
    pub annealing_iterations: u64,
    /// Number of legs routed along streets.
    pub legs_routed: usize,
}

/// A complete turn-by-turn delivery plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryPlan {
    /// Commands in the order the courier follows them.
    pub commands: Vec<NavigationCommand>,
    /// Sum of every `Proceed` distance, in miles.
    pub total_distance_miles: f64,
    /// Planning measurements.
    pub diagnostics: Diagnostics,
}

impl DeliveryPlan {
    /// A plan with no commands.
    pub fn empty(diagnostics: Diagnostics) -> Self {
        Self {
            commands: Vec::new(),
            total_distance_miles: 0.0,
            diagnostics,
        }
    }

    /// Items in delivery order.
    pub fn delivered_items(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            NavigationCommand::Deliver { item } => Some(item.as_str()),
            NavigationCommand::Proceed { .. } | NavigationCommand::Turn { .. } => None,
        })
    }
}

/// Errors returned by [`Planner::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The depot or a stop is not on the street map.
    #[error("bad coordinate {coordinate}: not on the street map")]
    BadCoordinate {
        /// The offending coordinate.
        coordinate: Coordinate,
    },
    /// Two consecutive tour locations are not connected by streets.
    #[error("no route found from {from} to {to}")]
    NoRouteFound {
        /// Leg origin.
        from: Coordinate,
        /// Leg destination.
        to: Coordinate,
    },
}

impl From<RouteError> for PlanError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::UnknownCoordinate { coordinate } => Self::BadCoordinate { coordinate },
            RouteError::NoRoute { from, to } => Self::NoRouteFound { from, to },
        }
    }
}

/// Turn a set of deliveries into navigation commands.
///
/// Implementations must return an error rather than a partial plan when any
/// leg cannot be routed. Planners must be `Send + Sync` to operate safely
/// across threads.
pub trait Planner: Send + Sync {
    /// Plan a delivery tour for `request`.
    fn plan(&self, request: &PlanRequest) -> Result<DeliveryPlan, PlanError>;
}
