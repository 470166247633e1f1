//! Turn-by-turn navigation commands.

use std::fmt;

/// Eight-point compass heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CompassDirection {
    /// Bearings in `[337.5, 360)` or `[0, 22.5)`.
    East,
    /// Bearings in `[22.5, 67.5)`.
    Northeast,
    /// Bearings in `[67.5, 112.5)`.
    North,
    /// Bearings in `[112.5, 157.5)`.
    Northwest,
    /// Bearings in `[157.5, 202.5)`.
    West,
    /// Bearings in `[202.5, 247.5)`.
    Southwest,
    /// Bearings in `[247.5, 292.5)`.
    South,
    /// Bearings in `[292.5, 337.5)`.
    Southeast,
}

impl CompassDirection {
    /// Bucket a bearing in degrees (0 = east, counter-clockwise).
    ///
    /// # Examples
    /// ```
    /// use courier_core::CompassDirection;
    ///
    /// assert_eq!(CompassDirection::from_bearing(10.0), CompassDirection::East);
    /// assert_eq!(CompassDirection::from_bearing(90.0), CompassDirection::North);
    /// assert_eq!(CompassDirection::from_bearing(337.5), CompassDirection::East);
    /// ```
    pub fn from_bearing(degrees: f64) -> Self {
        match degrees {
            d if (22.5..67.5).contains(&d) => Self::Northeast,
            d if (67.5..112.5).contains(&d) => Self::North,
            d if (112.5..157.5).contains(&d) => Self::Northwest,
            d if (157.5..202.5).contains(&d) => Self::West,
            d if (202.5..247.5).contains(&d) => Self::Southwest,
            d if (247.5..292.5).contains(&d) => Self::South,
            d if (292.5..337.5).contains(&d) => Self::Southeast,
            _ => Self::East,
        }
    }

    /// Lower-case name used in command text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::East => "east",
            Self::Northeast => "northeast",
            Self::North => "north",
            Self::Northwest => "northwest",
            Self::West => "west",
            Self::Southwest => "southwest",
            Self::South => "south",
            Self::Southeast => "southeast",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side to turn towards at a street change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TurnDirection {
    /// Counter-clockwise change of heading.
    Left,
    /// Clockwise change of heading.
    Right,
}

impl TurnDirection {
    /// Lower-case name used in command text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instruction for the courier, in emission order.
///
/// # Examples
/// ```
/// use courier_core::{CompassDirection, NavigationCommand, TurnDirection};
///
/// let proceed = NavigationCommand::Proceed {
///     direction: CompassDirection::North,
///     street: "Broxton Avenue".into(),
///     distance_miles: 0.0827,
/// };
/// assert_eq!(proceed.to_string(), "Proceed north 0.08 miles along Broxton Avenue");
///
/// let turn = NavigationCommand::Turn {
///     direction: TurnDirection::Left,
///     street: "Weyburn Avenue".into(),
/// };
/// assert_eq!(turn.to_string(), "Turn left on Weyburn Avenue");
///
/// let deliver = NavigationCommand::Deliver { item: "Pabst Blue Ribbon beer".into() };
/// assert_eq!(deliver.to_string(), "Deliver Pabst Blue Ribbon beer");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "command", rename_all = "lowercase")
)]
pub enum NavigationCommand {
    /// Travel along one street.
    Proceed {
        /// Heading at the start of the street run.
        direction: CompassDirection,
        /// Street being travelled.
        street: String,
        /// Length of the run in miles.
        distance_miles: f64,
    },
    /// Turn onto a new street.
    Turn {
        /// Side to turn towards.
        direction: TurnDirection,
        /// Street being turned onto.
        street: String,
    },
    /// Hand over an item at the current location.
    Deliver {
        /// Item description.
        item: String,
    },
}

impl NavigationCommand {
    /// Distance travelled by this command; zero for turns and deliveries.
    pub const fn distance_miles(&self) -> f64 {
        match self {
            Self::Proceed { distance_miles, .. } => *distance_miles,
            Self::Turn { .. } | Self::Deliver { .. } => 0.0,
        }
    }
}

impl fmt::Display for NavigationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed {
                direction,
                street,
                distance_miles,
            } => write!(f, "Proceed {direction} {distance_miles:.2} miles along {street}"),
            Self::Turn { direction, street } => write!(f, "Turn {direction} on {street}"),
            Self::Deliver { item } => write!(f, "Deliver {item}"),
        }
    }
}
