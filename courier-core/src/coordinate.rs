//! Street-graph vertex identity.
//!
//! A [`Coordinate`] keeps the exact decimal text it was built from. Equality
//! and hashing use that text so that two coordinates read from the same map
//! file always agree, regardless of floating-point rounding in the parsed
//! values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use geo::Coord;
use thiserror::Error;

/// Errors returned when constructing a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// The latitude text was not a finite decimal in `[-90, 90]`.
    #[error("invalid latitude {text:?}")]
    InvalidLatitude {
        /// Offending input.
        text: String,
    },
    /// The longitude text was not a finite decimal in `[-180, 180]`.
    #[error("invalid longitude {text:?}")]
    InvalidLongitude {
        /// Offending input.
        text: String,
    },
    /// The input did not contain exactly a latitude and a longitude.
    #[error("expected \"<latitude> <longitude>\", found {text:?}")]
    Malformed {
        /// Offending input.
        text: String,
    },
}

/// An immutable latitude/longitude pair identified by its decimal text.
///
/// Cloning is cheap: the text is shared.
///
/// # Examples
/// ```
/// use courier_core::Coordinate;
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let a = Coordinate::new("34.0625329", "-118.4470263")?;
/// let b: Coordinate = "34.0625329 -118.4470263".parse()?;
/// assert_eq!(a, b);
/// assert!((a.latitude() - 34.062_532_9).abs() < 1e-9);
///
/// // Same value, different text: a different vertex.
/// let c = Coordinate::new("34.06253290", "-118.4470263")?;
/// assert_ne!(a, c);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CoordinateText", into = "CoordinateText")
)]
pub struct Coordinate {
    latitude_text: Arc<str>,
    longitude_text: Arc<str>,
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Parse and validate a coordinate from its latitude and longitude text.
    ///
    /// Surrounding whitespace is trimmed before the text is stored.
    pub fn new(latitude_text: &str, longitude_text: &str) -> Result<Self, CoordinateError> {
        let latitude_text = latitude_text.trim();
        let longitude_text = longitude_text.trim();
        let latitude = parse_degrees(latitude_text, 90.0).ok_or_else(|| {
            CoordinateError::InvalidLatitude {
                text: latitude_text.to_owned(),
            }
        })?;
        let longitude = parse_degrees(longitude_text, 180.0).ok_or_else(|| {
            CoordinateError::InvalidLongitude {
                text: longitude_text.to_owned(),
            }
        })?;
        Ok(Self {
            latitude_text: Arc::from(latitude_text),
            longitude_text: Arc::from(longitude_text),
            latitude,
            longitude,
        })
    }

    /// Parsed latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Parsed longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude exactly as it was supplied.
    pub fn latitude_text(&self) -> &str {
        &self.latitude_text
    }

    /// Longitude exactly as it was supplied.
    pub fn longitude_text(&self) -> &str {
        &self.longitude_text
    }

    /// Planar `geo` coordinate with `x = longitude` and `y = latitude`.
    pub const fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

fn parse_degrees(text: &str, limit: f64) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (-limit..=limit).contains(value))
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude_text == other.latitude_text && self.longitude_text == other.longitude_text
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude_text.hash(state);
        self.longitude_text.hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.latitude_text, self.longitude_text)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(latitude), Some(longitude), None) => Self::new(latitude, longitude),
            _ => Err(CoordinateError::Malformed { text: s.to_owned() }),
        }
    }
}

/// Serialised form of a [`Coordinate`]: the original text pair.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CoordinateText {
    latitude: String,
    longitude: String,
}

#[cfg(feature = "serde")]
impl TryFrom<CoordinateText> for Coordinate {
    type Error = CoordinateError;

    fn try_from(text: CoordinateText) -> Result<Self, Self::Error> {
        Self::new(&text.latitude, &text.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<Coordinate> for CoordinateText {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude_text.to_string(),
            longitude: coordinate.longitude_text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::hash_map::DefaultHasher;

    fn digest(coordinate: &Coordinate) -> u64 {
        let mut hasher = DefaultHasher::new();
        coordinate.hash(&mut hasher);
        hasher.finish()
    }

    #[rstest]
    fn equal_text_means_equal_hash() {
        let a = Coordinate::new("34.0547000", "-118.4794734").expect("valid");
        let b = Coordinate::new(" 34.0547000", "-118.4794734 ").expect("valid");
        assert_eq!(a, b);
        assert_eq!(digest(&a), digest(&b));
    }

    #[rstest]
    fn equality_ignores_parsed_value() {
        let a = Coordinate::new("34.05", "-118.4").expect("valid");
        let b = Coordinate::new("34.050", "-118.4").expect("valid");
        assert_ne!(a, b);
        assert!((a.latitude() - b.latitude()).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("91", "0")]
    #[case("abc", "0")]
    #[case("NaN", "0")]
    fn rejects_bad_latitude(#[case] latitude: &str, #[case] longitude: &str) {
        let err = Coordinate::new(latitude, longitude).expect_err("latitude should fail");
        assert!(matches!(err, CoordinateError::InvalidLatitude { .. }));
    }

    #[rstest]
    #[case("0", "180.5")]
    #[case("0", "")]
    fn rejects_bad_longitude(#[case] latitude: &str, #[case] longitude: &str) {
        let err = Coordinate::new(latitude, longitude).expect_err("longitude should fail");
        assert!(matches!(err, CoordinateError::InvalidLongitude { .. }));
    }

    #[rstest]
    #[case("34.0")]
    #[case("34.0 -118.0 5")]
    #[case("")]
    fn from_str_requires_two_parts(#[case] input: &str) {
        let err = input.parse::<Coordinate>().expect_err("malformed input");
        assert!(matches!(err, CoordinateError::Malformed { .. }));
    }

    #[rstest]
    fn display_round_trips_through_from_str() {
        let coordinate = Coordinate::new("34.0625329", "-118.4470263").expect("valid");
        let parsed: Coordinate = coordinate.to_string().parse().expect("round trip");
        assert_eq!(parsed, coordinate);
    }

    #[rstest]
    fn geo_coord_uses_longitude_as_x() {
        let coordinate = Coordinate::new("1.5", "-2.5").expect("valid");
        let coord = coordinate.to_coord();
        assert!((coord.x + 2.5).abs() < f64::EPSILON);
        assert!((coord.y - 1.5).abs() < f64::EPSILON);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_text_pair() {
        let coordinate = Coordinate::new("34.0600", "-118.4400").expect("valid");
        let json = serde_json::to_string(&coordinate).expect("serialise");
        assert_eq!(json, r#"{"latitude":"34.0600","longitude":"-118.4400"}"#);
        let back: Coordinate = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, coordinate);
    }
}
