// Location model representing geographic points on the route

use serde::{Deserialize, Serialize};

use crate::models::Kilometers;
use crate::utils::distance::haversine_distance;

/// Represents a geographic location with latitude/longitude and a display address.
/// Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    latitude: f64,
    longitude: f64,

    /// Free-text address, also part of the location identity
    address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

impl Location {
    /// Creates a new location with the given coordinates and address
    pub fn new<S: Into<String>>(latitude: f64, longitude: f64, address: S) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
            city: None,
            state: None,
        }
    }

    /// Attaches city and state display information
    pub fn with_region<C: Into<String>, S: Into<String>>(mut self, city: C, state: S) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns true when both coordinates are finite numbers
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance to another location in kilometres
    pub fn distance_to(&self, other: &Location) -> Kilometers {
        haversine_distance(self, other)
    }
}

// Two locations are the same place only if coordinates and address all match.
impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.address == other.address
    }
}
