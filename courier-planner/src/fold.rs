//! Folding a routed leg into navigation commands.
//!
//! Consecutive segments on the same street collapse into one `Proceed`.
//! A street change emits the finished run's `Proceed` followed by a `Turn`
//! unless the heading barely changes.

use courier_core::geometry::{angle_between, bearing_degrees};
use courier_core::{CompassDirection, NavigationCommand, StreetSegment, TurnDirection};

/// A run of segments sharing one street name.
#[derive(Debug)]
struct StreetRun<'a> {
    first: &'a StreetSegment,
    last: &'a StreetSegment,
    distance_miles: f64,
}

impl<'a> StreetRun<'a> {
    fn start(segment: &'a StreetSegment) -> Self {
        Self {
            first: segment,
            last: segment,
            distance_miles: segment.length_miles(),
        }
    }

    #[expect(clippy::float_arithmetic, reason = "accumulates run length")]
    fn extend(self, segment: &'a StreetSegment) -> Self {
        Self {
            first: self.first,
            last: segment,
            distance_miles: self.distance_miles + segment.length_miles(),
        }
    }

    fn proceed(&self) -> NavigationCommand {
        NavigationCommand::Proceed {
            direction: CompassDirection::from_bearing(bearing_degrees(self.first)),
            street: self.first.name.clone(),
            distance_miles: self.distance_miles,
        }
    }
}

/// Folding state; `Done` means no run is open.
#[derive(Debug)]
enum FoldState<'a> {
    Accumulating(StreetRun<'a>),
    Done,
}

/// Converts the segments of one leg into commands.
#[derive(Debug)]
pub(crate) struct LegFolder<'a> {
    state: FoldState<'a>,
    turn_tolerance_degrees: f64,
    commands: Vec<NavigationCommand>,
}

impl<'a> LegFolder<'a> {
    pub(crate) const fn new(turn_tolerance_degrees: f64) -> Self {
        Self {
            state: FoldState::Done,
            turn_tolerance_degrees,
            commands: Vec::new(),
        }
    }

    /// Fold every segment of `segments` and flush the final run.
    pub(crate) fn fold(
        turn_tolerance_degrees: f64,
        segments: &'a [StreetSegment],
    ) -> Vec<NavigationCommand> {
        let mut folder = Self::new(turn_tolerance_degrees);
        for segment in segments {
            folder.push(segment);
        }
        folder.finish()
    }

    pub(crate) fn push(&mut self, segment: &'a StreetSegment) {
        let state = std::mem::replace(&mut self.state, FoldState::Done);
        self.state = match state {
            FoldState::Done => FoldState::Accumulating(StreetRun::start(segment)),
            FoldState::Accumulating(run) if run.first.name == segment.name => {
                FoldState::Accumulating(run.extend(segment))
            }
            FoldState::Accumulating(run) => {
                self.commands.push(run.proceed());
                let angle = angle_between(run.last, segment);
                if let Some(direction) = turn_direction(angle, self.turn_tolerance_degrees) {
                    self.commands.push(NavigationCommand::Turn {
                        direction,
                        street: segment.name.clone(),
                    });
                }
                FoldState::Accumulating(StreetRun::start(segment))
            }
        };
    }

    /// Flush any open run and return the commands.
    pub(crate) fn finish(mut self) -> Vec<NavigationCommand> {
        if let FoldState::Accumulating(run) = std::mem::replace(&mut self.state, FoldState::Done) {
            self.commands.push(run.proceed());
        }
        self.commands
    }
}

/// Classify a heading change; `None` when within `tolerance` of straight on.
#[expect(clippy::float_arithmetic, reason = "compares against 360 - tolerance")]
pub(crate) fn turn_direction(angle_degrees: f64, tolerance_degrees: f64) -> Option<TurnDirection> {
    if angle_degrees < tolerance_degrees || angle_degrees > 360.0 - tolerance_degrees {
        None
    } else if angle_degrees < 180.0 {
        Some(TurnDirection::Left)
    } else {
        Some(TurnDirection::Right)
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating-point distances"
)]
mod tests {
    use super::*;
    use courier_core::test_support::coordinate;
    use rstest::rstest;

    fn segment(from: (&str, &str), to: (&str, &str), name: &str) -> StreetSegment {
        StreetSegment::new(coordinate(from.0, from.1), coordinate(to.0, to.1), name)
    }

    #[rstest]
    #[case(0.0, None)]
    #[case(0.5, None)]
    #[case(359.5, None)]
    #[case(1.0, Some(TurnDirection::Left))]
    #[case(90.0, Some(TurnDirection::Left))]
    #[case(179.9, Some(TurnDirection::Left))]
    #[case(180.0, Some(TurnDirection::Right))]
    #[case(270.0, Some(TurnDirection::Right))]
    #[case(359.0, Some(TurnDirection::Right))]
    fn classifies_turns(#[case] angle: f64, #[case] expected: Option<TurnDirection>) {
        assert_eq!(turn_direction(angle, 1.0), expected);
    }

    #[rstest]
    fn wider_tolerance_suppresses_gentle_bends() {
        assert_eq!(turn_direction(4.0, 5.0), None);
        assert_eq!(turn_direction(356.0, 5.0), None);
        assert_eq!(turn_direction(6.0, 5.0), Some(TurnDirection::Left));
    }

    #[rstest]
    fn empty_leg_emits_nothing() {
        assert!(LegFolder::fold(1.0, &[]).is_empty());
    }

    #[rstest]
    fn one_street_is_one_proceed() {
        let segments = [
            segment(("34.0", "-118.000"), ("34.0", "-118.001"), "Gayley Avenue"),
            segment(("34.0", "-118.001"), ("34.0", "-118.002"), "Gayley Avenue"),
        ];
        let commands = LegFolder::fold(1.0, &segments);
        let expected = segments[0].length_miles() + segments[1].length_miles();
        match commands.as_slice() {
            [NavigationCommand::Proceed {
                direction,
                street,
                distance_miles,
            }] => {
                // Heading west: longitude decreases.
                assert_eq!(*direction, CompassDirection::West);
                assert_eq!(street, "Gayley Avenue");
                assert!((distance_miles - expected).abs() < 1e-12);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[rstest]
    fn street_change_turns_left() {
        // East along Weyburn, then north on Broxton.
        let segments = [
            segment(("34.0", "-118.002"), ("34.0", "-118.001"), "Weyburn Avenue"),
            segment(("34.0", "-118.001"), ("34.001", "-118.001"), "Broxton Avenue"),
        ];
        let commands = LegFolder::fold(1.0, &segments);
        let text: Vec<_> = commands.iter().map(ToString::to_string).collect();
        assert_eq!(text.len(), 3);
        assert!(text[0].starts_with("Proceed east"));
        assert_eq!(text[1], "Turn left on Broxton Avenue");
        assert!(text[2].starts_with("Proceed north"));
    }

    #[rstest]
    fn street_change_turns_right() {
        // East along Weyburn, then south on Glendon.
        let segments = [
            segment(("34.0", "-118.002"), ("34.0", "-118.001"), "Weyburn Avenue"),
            segment(("34.0", "-118.001"), ("33.999", "-118.001"), "Glendon Avenue"),
        ];
        let commands = LegFolder::fold(1.0, &segments);
        assert!(matches!(
            commands.get(1),
            Some(NavigationCommand::Turn {
                direction: TurnDirection::Right,
                ..
            })
        ));
    }

    #[rstest]
    fn straight_rename_has_no_turn() {
        let segments = [
            segment(("34.0", "-118.002"), ("34.0", "-118.001"), "Le Conte Avenue"),
            segment(("34.0", "-118.001"), ("34.0", "-118.000"), "Charles Young Drive"),
        ];
        let commands = LegFolder::fold(1.0, &segments);
        assert_eq!(commands.len(), 2);
        assert!(commands
            .iter()
            .all(|command| matches!(command, NavigationCommand::Proceed { .. })));
    }

    #[rstest]
    fn direction_comes_from_first_segment_of_run() {
        // North-east first, then due north on the same street.
        let segments = [
            segment(("34.000", "-118.000"), ("34.001", "-117.999"), "Westwood Boulevard"),
            segment(("34.001", "-117.999"), ("34.003", "-117.999"), "Westwood Boulevard"),
        ];
        let commands = LegFolder::fold(1.0, &segments);
        assert!(matches!(
            commands.as_slice(),
            [NavigationCommand::Proceed {
                direction: CompassDirection::Northeast,
                ..
            }]
        ));
    }
}
