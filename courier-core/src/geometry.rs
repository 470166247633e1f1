//! Distance and bearing helpers.
//!
//! Distances are great-circle (haversine) distances in statute miles.
//! Angles are in degrees measured counter-clockwise from east and always fall
//! in `[0, 360)`.

use crate::{Coordinate, StreetSegment};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// Great-circle distance between two coordinates in miles.
///
/// Symmetric, and zero when both coordinates describe the same point.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, geometry::distance_miles};
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let a = Coordinate::new("0", "0")?;
/// let b = Coordinate::new("0", "1")?;
/// let miles = distance_miles(&a, &b);
/// assert!((miles - 69.09).abs() < 0.01);
/// assert_eq!(distance_miles(&a, &a), 0.0);
/// # Ok(())
/// # }
/// ```
pub fn distance_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let u = ((lat2 - lat1) / 2.0).sin();
    let v = ((to.longitude() - from.longitude()).to_radians() / 2.0).sin();
    let km = 2.0 * EARTH_RADIUS_KM * (u * u + lat1.cos() * lat2.cos() * v * v).sqrt().asin();
    km / KM_PER_MILE
}

/// Direction of travel along `segment`.
///
/// Computed in planar `(longitude, latitude)` space: 0° is east, 90° is
/// north.
pub fn bearing_degrees(segment: &StreetSegment) -> f64 {
    let delta = segment.to_line().delta();
    normalise_degrees(delta.y.atan2(delta.x).to_degrees())
}

/// Counter-clockwise change of heading when moving from `from` onto `to`.
///
/// Values just above 0° are gentle left turns, values just below 360° are
/// gentle right turns.
pub fn angle_between(from: &StreetSegment, to: &StreetSegment) -> f64 {
    normalise_degrees(bearing_degrees(to) - bearing_degrees(from))
}

fn normalise_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
