//! Simulated annealing over the stop visiting order.
//!
//! The optimiser only looks at straight-line ("crow-fly") distances; street
//! routing happens afterwards, once per leg of the chosen order.

use courier_core::geometry::distance_miles;
use courier_core::{Coordinate, DeliveryStop};
use log::{debug, info};
use rand::Rng;
use thiserror::Error;

/// Cooling schedule for [`TourOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingConfig {
    /// Temperature of the first iteration.
    pub initial_temperature: f64,
    /// Multiplicative decay applied after every iteration, in `(0, 1)`.
    pub cooling_rate: f64,
    /// Annealing stops once the temperature falls to this value.
    pub min_temperature: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.99,
            min_temperature: 0.01,
        }
    }
}

/// Errors returned by [`AnnealingConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AnnealingConfigError {
    /// The cooling rate must lie strictly between zero and one.
    #[error("cooling rate must be in (0, 1), got {0}")]
    CoolingRateOutOfRange(f64),
    /// A temperature was zero, negative or not finite.
    #[error("{name} temperature must be finite and positive, got {value}")]
    InvalidTemperature {
        /// Which temperature was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The schedule would start at or below its stopping point.
    #[error("initial temperature {initial} must exceed minimum temperature {min}")]
    TemperatureOrder {
        /// Configured starting temperature.
        initial: f64,
        /// Configured stopping temperature.
        min: f64,
    },
}

impl AnnealingConfig {
    /// Check that the schedule terminates and starts above its floor.
    ///
    /// # Errors
    ///
    /// Returns [`AnnealingConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), AnnealingConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.initial_temperature) {
            return Err(AnnealingConfigError::InvalidTemperature {
                name: "initial",
                value: self.initial_temperature,
            });
        }
        if !positive(self.min_temperature) {
            return Err(AnnealingConfigError::InvalidTemperature {
                name: "minimum",
                value: self.min_temperature,
            });
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(AnnealingConfigError::CoolingRateOutOfRange(
                self.cooling_rate,
            ));
        }
        if self.initial_temperature <= self.min_temperature {
            return Err(AnnealingConfigError::TemperatureOrder {
                initial: self.initial_temperature,
                min: self.min_temperature,
            });
        }
        Ok(())
    }
}

/// Result of [`TourOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedTour {
    /// Stops in the chosen visiting order.
    pub stops: Vec<DeliveryStop>,
    /// Crow-fly tour length in the caller's order, depot to depot.
    pub original_crow_miles: f64,
    /// Crow-fly tour length in the chosen order, depot to depot.
    pub optimized_crow_miles: f64,
    /// Annealing iterations performed.
    pub iterations: u64,
}

/// Reorders stops to shorten the crow-fly tour.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, DeliveryStop};
/// use courier_planner::TourOptimizer;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let depot = Coordinate::new("34.0", "-118.0")?;
/// let stops = vec![
///     DeliveryStop::new(Coordinate::new("34.01", "-118.0")?, "Tofu"),
///     DeliveryStop::new(Coordinate::new("34.0", "-118.01")?, "Sardines"),
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let tour = TourOptimizer::default().optimize(&depot, &stops, &mut rng);
/// assert_eq!(tour.stops.len(), 2);
/// assert!(tour.optimized_crow_miles <= tour.original_crow_miles);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TourOptimizer {
    config: AnnealingConfig,
}

impl TourOptimizer {
    /// Build an optimiser with a validated cooling schedule.
    ///
    /// # Errors
    ///
    /// Returns [`AnnealingConfigError`] when `config` is invalid.
    pub fn new(config: AnnealingConfig) -> Result<Self, AnnealingConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The cooling schedule in use.
    #[must_use]
    pub const fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Choose a visiting order for `stops`, drawing randomness from `rng`.
    ///
    /// The returned order is the best one seen during annealing, so its
    /// crow-fly length never exceeds the caller's order. Fewer than two stops
    /// are returned unchanged without iterating.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "annealing compares and cools floating-point tour costs"
    )]
    pub fn optimize<R: Rng>(
        &self,
        depot: &Coordinate,
        stops: &[DeliveryStop],
        rng: &mut R,
    ) -> OptimizedTour {
        let original_crow_miles = crow_distance(depot, stops);
        if stops.len() < 2 {
            return OptimizedTour {
                stops: stops.to_vec(),
                original_crow_miles,
                optimized_crow_miles: original_crow_miles,
                iterations: 0,
            };
        }

        let mut current = stops.to_vec();
        let mut current_cost = original_crow_miles;
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut temperature = self.config.initial_temperature;
        let mut iterations = 0_u64;

        while temperature > self.config.min_temperature {
            let (first, second) = distinct_positions(rng, current.len());
            current.swap(first, second);
            let candidate_cost = crow_distance(depot, &current);
            let delta = candidate_cost - current_cost;
            let accept = delta < 0.0 || (-delta / temperature).exp() > rng.r#gen::<f64>();
            if accept {
                current_cost = candidate_cost;
                if current_cost < best_cost {
                    best_cost = current_cost;
                    best.clone_from(&current);
                }
            } else {
                current.swap(first, second);
            }
            temperature *= self.config.cooling_rate;
            iterations += 1;
        }

        debug!("annealing ran {iterations} iterations over {} stops", stops.len());
        info!(
            "tour optimised: {original_crow_miles:.3} crow-fly miles reduced to {best_cost:.3}"
        );
        OptimizedTour {
            stops: best,
            original_crow_miles,
            optimized_crow_miles: best_cost,
            iterations,
        }
    }
}

/// Two different positions in `0..len`; `len` must be at least two.
fn distinct_positions<R: Rng>(rng: &mut R, len: usize) -> (usize, usize) {
    let first = rng.gen_range(0..len);
    let offset = rng.gen_range(0..len - 1);
    let second = if offset >= first { offset + 1 } else { offset };
    (first, second)
}

/// Crow-fly length of depot, every stop in order, then depot again.
///
/// An empty stop list has zero length.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "sums leg distances")]
pub fn crow_distance(depot: &Coordinate, stops: &[DeliveryStop]) -> f64 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return 0.0;
    };
    let between: f64 = stops
        .windows(2)
        .filter_map(|pair| match pair {
            [from, to] => Some(distance_miles(&from.location, &to.location)),
            _ => None,
        })
        .sum();
    distance_miles(depot, &first.location) + between + distance_miles(&last.location, depot)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating-point distances"
)]
mod tests {
    use super::*;
    use courier_core::test_support::coordinate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    fn stop(latitude: &str, longitude: &str, item: &str) -> DeliveryStop {
        DeliveryStop::new(coordinate(latitude, longitude), item)
    }

    #[fixture]
    fn depot() -> Coordinate {
        coordinate("34.0000", "-118.0000")
    }

    /// Points on a square visited in a crossing order.
    #[fixture]
    fn crossed_square() -> Vec<DeliveryStop> {
        vec![
            stop("34.0100", "-118.0000", "a"),
            stop("34.0000", "-118.0100", "b"),
            stop("34.0100", "-118.0100", "c"),
            stop("34.0050", "-117.9950", "d"),
            stop("34.0150", "-118.0050", "e"),
        ]
    }

    #[rstest]
    fn default_schedule_matches_documented_values() {
        let config = AnnealingConfig::default();
        assert!((config.initial_temperature - 100.0).abs() < f64::EPSILON);
        assert!((config.cooling_rate - 0.99).abs() < f64::EPSILON);
        assert!((config.min_temperature - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.validate(), Ok(()));
    }

    #[rstest]
    #[case(AnnealingConfig { cooling_rate: 1.0, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { cooling_rate: 0.0, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { cooling_rate: f64::NAN, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { initial_temperature: -1.0, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { min_temperature: 0.0, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { min_temperature: f64::INFINITY, ..AnnealingConfig::default() })]
    #[case(AnnealingConfig { initial_temperature: 0.01, min_temperature: 0.02, ..AnnealingConfig::default() })]
    fn rejects_invalid_schedules(#[case] config: AnnealingConfig) {
        assert!(TourOptimizer::new(config).is_err());
    }

    #[rstest]
    fn empty_and_single_stop_are_unchanged(depot: Coordinate) {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let optimizer = TourOptimizer::default();

        let empty = optimizer.optimize(&depot, &[], &mut rng);
        assert!(empty.stops.is_empty());
        assert_eq!(empty.iterations, 0);
        assert!(empty.original_crow_miles.abs() < f64::EPSILON);

        let single = vec![stop("34.0100", "-118.0000", "only")];
        let tour = optimizer.optimize(&depot, &single, &mut rng);
        assert_eq!(tour.stops, single);
        assert_eq!(tour.iterations, 0);
        assert!((tour.original_crow_miles - tour.optimized_crow_miles).abs() < f64::EPSILON);
        assert!(tour.original_crow_miles > 0.0);
    }

    #[rstest]
    fn default_schedule_runs_until_floor(depot: Coordinate, crossed_square: Vec<DeliveryStop>) {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tour = TourOptimizer::default().optimize(&depot, &crossed_square, &mut rng);
        // 100 * 0.99^n <= 0.01 first holds at n = 917.
        assert_eq!(tour.iterations, 917);
    }

    #[rstest]
    fn never_worse_than_input(depot: Coordinate, crossed_square: Vec<DeliveryStop>) {
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tour = TourOptimizer::default().optimize(&depot, &crossed_square, &mut rng);
            assert!(tour.optimized_crow_miles <= tour.original_crow_miles + 1e-9);
            let recomputed = crow_distance(&depot, &tour.stops);
            assert!((recomputed - tour.optimized_crow_miles).abs() < 1e-9);
        }
    }

    #[rstest]
    fn output_is_permutation(depot: Coordinate, crossed_square: Vec<DeliveryStop>) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let tour = TourOptimizer::default().optimize(&depot, &crossed_square, &mut rng);
        let mut expected: Vec<_> = crossed_square.iter().map(|s| s.item.clone()).collect();
        let mut actual: Vec<_> = tour.stops.iter().map(|s| s.item.clone()).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[rstest]
    fn same_seed_same_order(depot: Coordinate, crossed_square: Vec<DeliveryStop>) {
        let optimizer = TourOptimizer::default();
        let first = optimizer.optimize(&depot, &crossed_square, &mut ChaCha8Rng::seed_from_u64(5));
        let second = optimizer.optimize(&depot, &crossed_square, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(first, second);
    }

    #[rstest]
    fn crow_distance_includes_return_leg(depot: Coordinate) {
        let there = stop("34.0100", "-118.0000", "x");
        let out = distance_miles(&depot, &there.location);
        let total = crow_distance(&depot, std::slice::from_ref(&there));
        assert!((total - 2.0 * out).abs() < 1e-12);
    }

    #[rstest]
    fn distinct_positions_never_collide() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for len in 2..6 {
            for _ in 0..200 {
                let (first, second) = distinct_positions(&mut rng, len);
                assert_ne!(first, second);
                assert!(first < len && second < len);
            }
        }
    }
}
