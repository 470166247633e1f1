//! [`RoutePlanner`]: tour optimisation, per-leg routing and command folding.

use std::time::Instant;

use courier_core::{
    Coordinate, DeliveryPlan, Diagnostics, NavigationCommand, PlanError, PlanRequest, Planner,
    Route, RouteFinder,
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::fold::LegFolder;
use crate::optimizer::{AnnealingConfig, AnnealingConfigError, TourOptimizer};

/// Default heading change, in degrees, still treated as straight on.
pub const DEFAULT_TURN_TOLERANCE_DEGREES: f64 = 1.0;

/// Configuration for [`RoutePlanner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePlannerConfig {
    /// Cooling schedule for the tour optimiser.
    pub annealing: AnnealingConfig,
    /// Heading changes closer than this to 0° or 360° emit no turn.
    pub turn_tolerance_degrees: f64,
}

impl Default for RoutePlannerConfig {
    fn default() -> Self {
        Self {
            annealing: AnnealingConfig::default(),
            turn_tolerance_degrees: DEFAULT_TURN_TOLERANCE_DEGREES,
        }
    }
}

/// Errors returned by [`RoutePlanner::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlannerConfigError {
    /// The cooling schedule is invalid.
    #[error(transparent)]
    Annealing(#[from] AnnealingConfigError),
    /// The turn tolerance must lie in `(0, 180)`.
    #[error("turn tolerance must be in (0, 180) degrees, got {0}")]
    TurnTolerance(f64),
}

impl RoutePlannerConfig {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerConfigError`] for the first invalid setting.
    pub fn validate(&self) -> Result<(), PlannerConfigError> {
        self.annealing.validate()?;
        let tolerance = self.turn_tolerance_degrees;
        if !(tolerance > 0.0 && tolerance < 180.0) {
            return Err(PlannerConfigError::TurnTolerance(tolerance));
        }
        Ok(())
    }
}

/// Plans delivery tours over any [`RouteFinder`].
///
/// The optimiser picks a stop order on crow-fly distance, then every leg
/// (depot, each stop, back to the depot) is routed and folded into
/// commands. Any leg failure aborts the whole plan.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, DeliveryStop, PlanRequest, Planner, StreetMap};
/// use courier_planner::{AStarRouter, RoutePlanner};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let depot = Coordinate::new("34.0", "-118.002")?;
/// let corner = Coordinate::new("34.0", "-118.001")?;
/// let shop = Coordinate::new("34.001", "-118.001")?;
/// let mut map = StreetMap::new();
/// map.add_street("Weyburn Avenue", depot.clone(), corner.clone());
/// map.add_street("Broxton Avenue", corner, shop.clone());
///
/// let planner = RoutePlanner::new(AStarRouter::new(map));
/// let request = PlanRequest {
///     depot,
///     stops: vec![DeliveryStop::new(shop, "Sardines")],
///     seed: 1,
/// };
/// let plan = planner.plan(&request)?;
/// let text: Vec<String> = plan.commands.iter().map(ToString::to_string).collect();
/// assert_eq!(text[1], "Turn left on Broxton Avenue");
/// assert_eq!(text[3], "Deliver Sardines");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlanner<R> {
    router: R,
    optimizer: TourOptimizer,
    turn_tolerance_degrees: f64,
}

impl<R: RouteFinder> RoutePlanner<R> {
    /// Planner with the default configuration.
    pub fn new(router: R) -> Self {
        Self {
            router,
            optimizer: TourOptimizer::default(),
            turn_tolerance_degrees: DEFAULT_TURN_TOLERANCE_DEGREES,
        }
    }

    /// Planner with an explicit, validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerConfigError`] when `config` is invalid.
    pub fn with_config(router: R, config: RoutePlannerConfig) -> Result<Self, PlannerConfigError> {
        config.validate()?;
        Ok(Self {
            router,
            optimizer: TourOptimizer::new(config.annealing)?,
            turn_tolerance_degrees: config.turn_tolerance_degrees,
        })
    }

    /// The router used for every leg.
    #[must_use]
    pub const fn router(&self) -> &R {
        &self.router
    }

    /// Plan `request`, drawing optimiser randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::BadCoordinate`] when the depot or a stop is not
    /// on the street map and [`PlanError::NoRouteFound`] when a leg cannot
    /// be routed.
    pub fn plan_with_rng<G: Rng>(
        &self,
        request: &PlanRequest,
        rng: &mut G,
    ) -> Result<DeliveryPlan, PlanError> {
        let started_at = Instant::now();
        self.ensure_on_map(&request.depot)?;
        for stop in &request.stops {
            self.ensure_on_map(&stop.location)?;
        }
        if request.stops.is_empty() {
            debug!("no stops requested; returning an empty plan");
            return Ok(DeliveryPlan::empty(Diagnostics {
                plan_time: started_at.elapsed(),
                ..Diagnostics::default()
            }));
        }

        let tour = self.optimizer.optimize(&request.depot, &request.stops, rng);
        let mut commands = Vec::new();
        let mut legs_routed = 0_usize;
        let mut from = &request.depot;
        for stop in &tour.stops {
            let route = self.route_leg(from, &stop.location)?;
            commands.extend(LegFolder::fold(self.turn_tolerance_degrees, route.segments()));
            commands.push(NavigationCommand::Deliver {
                item: stop.item.clone(),
            });
            legs_routed += 1;
            from = &stop.location;
        }
        let home = self.route_leg(from, &request.depot)?;
        commands.extend(LegFolder::fold(self.turn_tolerance_degrees, home.segments()));
        legs_routed += 1;

        let total_distance_miles = commands.iter().map(NavigationCommand::distance_miles).sum();
        let diagnostics = Diagnostics {
            plan_time: started_at.elapsed(),
            original_crow_miles: tour.original_crow_miles,
            optimized_crow_miles: tour.optimized_crow_miles,
            annealing_iterations: tour.iterations,
            legs_routed,
        };
        info!(
            "planned {} deliveries over {legs_routed} legs: {total_distance_miles:.2} miles, {} commands",
            tour.stops.len(),
            commands.len()
        );
        Ok(DeliveryPlan {
            commands,
            total_distance_miles,
            diagnostics,
        })
    }

    fn ensure_on_map(&self, coordinate: &Coordinate) -> Result<(), PlanError> {
        if self.router.is_known(coordinate) {
            Ok(())
        } else {
            warn!("plan aborted: {coordinate} is not on the street map");
            Err(PlanError::BadCoordinate {
                coordinate: coordinate.clone(),
            })
        }
    }

    fn route_leg(&self, from: &Coordinate, to: &Coordinate) -> Result<Route, PlanError> {
        self.router.find_route(from, to).map_err(|err| {
            warn!("plan aborted on leg {from} -> {to}: {err}");
            PlanError::from(err)
        })
    }
}

impl<R> Planner for RoutePlanner<R>
where
    R: RouteFinder + Send + Sync,
{
    fn plan(&self, request: &PlanRequest) -> Result<DeliveryPlan, PlanError> {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        self.plan_with_rng(request, &mut rng)
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating-point distances"
)]
mod tests {
    use super::*;
    use crate::AStarRouter;
    use courier_core::test_support::{GridMap, coordinate};
    use courier_core::{DeliveryStop, RouteError, StreetMap};
    use rstest::{fixture, rstest};

    #[fixture]
    fn grid() -> GridMap {
        GridMap::new(4, 4)
    }

    fn request(depot: Coordinate, stops: Vec<DeliveryStop>) -> PlanRequest {
        PlanRequest {
            depot,
            stops,
            seed: 42,
        }
    }

    /// Router whose every leg fails with a fixed error.
    struct BrokenRouter(RouteError);

    impl RouteFinder for BrokenRouter {
        fn find_route(&self, _: &Coordinate, _: &Coordinate) -> Result<Route, RouteError> {
            Err(self.0.clone())
        }

        fn is_known(&self, _: &Coordinate) -> bool {
            true
        }
    }

    #[rstest]
    fn zero_stops_is_empty_plan(grid: GridMap) {
        let planner = RoutePlanner::new(AStarRouter::new(grid.map()));
        let plan = planner
            .plan(&request(grid.intersection(0, 0), Vec::new()))
            .expect("depot on map");
        assert!(plan.commands.is_empty());
        assert!(plan.total_distance_miles.abs() < f64::EPSILON);
        assert_eq!(plan.diagnostics.legs_routed, 0);
    }

    #[rstest]
    fn unknown_depot_is_bad_coordinate(grid: GridMap) {
        let planner = RoutePlanner::new(AStarRouter::new(grid.map()));
        let depot = coordinate("10.0", "10.0");
        let err = planner
            .plan(&request(depot.clone(), Vec::new()))
            .expect_err("depot off map");
        assert_eq!(err, PlanError::BadCoordinate { coordinate: depot });
    }

    #[rstest]
    fn unknown_stop_is_bad_coordinate(grid: GridMap) {
        let planner = RoutePlanner::new(AStarRouter::new(grid.map()));
        let stray = coordinate("10.0", "10.0");
        let stops = vec![
            DeliveryStop::new(grid.intersection(1, 1), "Tofu"),
            DeliveryStop::new(stray.clone(), "Sardines"),
        ];
        let err = planner
            .plan(&request(grid.intersection(0, 0), stops))
            .expect_err("stop off map");
        assert_eq!(err, PlanError::BadCoordinate { coordinate: stray });
    }

    #[rstest]
    fn leg_failure_maps_to_no_route() {
        let a = coordinate("34.0", "-118.0");
        let b = coordinate("35.0", "-118.0");
        let planner = RoutePlanner::new(BrokenRouter(RouteError::NoRoute {
            from: a.clone(),
            to: b.clone(),
        }));
        let err = planner
            .plan(&request(a.clone(), vec![DeliveryStop::new(b.clone(), "Tofu")]))
            .expect_err("router fails");
        assert_eq!(err, PlanError::NoRouteFound { from: a, to: b });
    }

    #[rstest]
    fn every_stop_is_delivered_once(grid: GridMap) {
        let planner = RoutePlanner::new(AStarRouter::new(grid.map()));
        let stops = vec![
            DeliveryStop::new(grid.intersection(3, 3), "Chicken tenders"),
            DeliveryStop::new(grid.intersection(0, 3), "B-Plate salmon"),
            DeliveryStop::new(grid.intersection(3, 0), "Pabst Blue Ribbon beer"),
        ];
        let plan = planner
            .plan(&request(grid.intersection(0, 0), stops))
            .expect("grid is connected");
        let mut delivered: Vec<_> = plan.delivered_items().collect();
        delivered.sort_unstable();
        assert_eq!(
            delivered,
            ["B-Plate salmon", "Chicken tenders", "Pabst Blue Ribbon beer"]
        );
        assert_eq!(plan.diagnostics.legs_routed, 4);
        assert!(plan.diagnostics.optimized_crow_miles <= plan.diagnostics.original_crow_miles + 1e-9);
        let summed: f64 = plan.commands.iter().map(NavigationCommand::distance_miles).sum();
        assert!((plan.total_distance_miles - summed).abs() < 1e-12);
        assert!(!matches!(plan.commands.last(), Some(NavigationCommand::Deliver { .. })));
    }

    #[rstest]
    fn stop_at_depot_delivers_without_moving() {
        let depot = coordinate("34.0", "-118.0");
        let mut map = StreetMap::new();
        map.add_street("Tiverton Avenue", depot.clone(), coordinate("34.001", "-118.0"));
        let planner = RoutePlanner::new(AStarRouter::new(map));
        let plan = planner
            .plan(&request(depot.clone(), vec![DeliveryStop::new(depot, "Kale")]))
            .expect("depot stop");
        let text: Vec<_> = plan.commands.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["Deliver Kale"]);
        assert!(plan.total_distance_miles.abs() < f64::EPSILON);
    }

    #[rstest]
    fn same_seed_same_plan(grid: GridMap) {
        let planner = RoutePlanner::new(AStarRouter::new(grid.map()));
        let stops = vec![
            DeliveryStop::new(grid.intersection(3, 1), "a"),
            DeliveryStop::new(grid.intersection(1, 3), "b"),
            DeliveryStop::new(grid.intersection(2, 2), "c"),
        ];
        let req = request(grid.intersection(0, 0), stops);
        let first = planner.plan(&req).expect("plan");
        let second = planner.plan(&req).expect("plan");
        assert_eq!(first.commands, second.commands);
    }

    #[rstest]
    #[case(RoutePlannerConfig { turn_tolerance_degrees: 0.0, ..RoutePlannerConfig::default() })]
    #[case(RoutePlannerConfig { turn_tolerance_degrees: 180.0, ..RoutePlannerConfig::default() })]
    #[case(RoutePlannerConfig { turn_tolerance_degrees: f64::NAN, ..RoutePlannerConfig::default() })]
    fn rejects_bad_tolerance(#[case] config: RoutePlannerConfig) {
        let router = BrokenRouter(RouteError::NoRoute {
            from: coordinate("0", "0"),
            to: coordinate("0", "1"),
        });
        let result = RoutePlanner::with_config(router, config);
        assert!(matches!(result, Err(PlannerConfigError::TurnTolerance(_))));
    }

    #[rstest]
    fn config_errors_render_their_cause() {
        let tolerance = PlannerConfigError::TurnTolerance(200.0);
        assert_eq!(
            tolerance.to_string(),
            "turn tolerance must be in (0, 180) degrees, got 200"
        );
        let schedule = PlannerConfigError::from(AnnealingConfigError::CoolingRateOutOfRange(1.5));
        assert_eq!(schedule.to_string(), "cooling rate must be in (0, 1), got 1.5");
    }

    #[rstest]
    fn rejects_bad_schedule() {
        let config = RoutePlannerConfig {
            annealing: AnnealingConfig {
                cooling_rate: 1.5,
                ..AnnealingConfig::default()
            },
            ..RoutePlannerConfig::default()
        };
        let result = RoutePlanner::with_config(AStarRouter::new(StreetMap::new()), config);
        assert!(matches!(result, Err(PlannerConfigError::Annealing(_))));
    }
}
