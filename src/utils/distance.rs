// Distance calculation utilities

use crate::models::{Kilometers, Location};

/// Mean Earth radius used by the spherical model
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two locations (haversine formula)
pub fn haversine_distance(p1: &Location, p2: &Location) -> Kilometers {
    let lat_distance = (p2.latitude() - p1.latitude()).to_radians();
    let lon_distance = (p2.longitude() - p1.longitude()).to_radians();

    let a = (lat_distance / 2.0).sin().powi(2)
        + p1.latitude().to_radians().cos()
            * p2.latitude().to_radians().cos()
            * (lon_distance / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Convert a distance into minutes of driving at a constant speed
pub fn travel_minutes(distance: Kilometers, speed_kmh: f64) -> f64 {
    distance / speed_kmh * 60.0
}
