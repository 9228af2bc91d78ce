//! Great-circle distance on a spherical Earth

use crate::core::{Coordinates, EARTH_RADIUS_M};

/// Haversine distance between two points (meters).
///
/// Inputs are assumed to be valid latitude/longitude pairs; nothing is
/// clamped or normalised.
pub fn distance_m(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude_rad();
    let lat2 = b.latitude_rad();
    let dlat = lat2 - lat1;
    let dlon = b.longitude_rad() - a.longitude_rad();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Whether `b` lies within `radius_m` of `a`
pub fn within_radius(a: &Coordinates, b: &Coordinates, radius_m: f64) -> bool {
    distance_m(a, b) <= radius_m
}
