// Optimization request and its validated form

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RequestError;
use crate::models::{Delivery, Location, Minutes};

/// Upper bound on deliveries in a single route
pub const MAX_DELIVERIES: usize = 20;
/// Shortest product deadline accepted
pub const MIN_PRODUCT_DEADLINE_MINUTES: u32 = 30;
pub const MIN_VEHICLE_SPEED_KMH: f64 = 20.0;
pub const MAX_VEHICLE_SPEED_KMH: f64 = 120.0;
pub const DEFAULT_VEHICLE_SPEED_KMH: f64 = 60.0;

fn default_vehicle_speed() -> f64 {
    DEFAULT_VEHICLE_SPEED_KMH
}

fn default_use_travel_provider() -> bool {
    true
}

/// Raw route optimization request, as received from a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    /// Depot: where the route starts and ends
    pub start_location: Location,

    pub deliveries: Vec<Delivery>,

    /// Average speed used by the geometric travel time estimator
    #[serde(default = "default_vehicle_speed", rename = "vehicleSpeedKmH")]
    pub vehicle_speed_kmh: f64,

    /// Fixed handling time spent at every delivery stop
    #[serde(default)]
    pub loading_time_minutes: u32,

    /// Ask the configured travel time provider; when false the estimator is used
    #[serde(default = "default_use_travel_provider")]
    pub use_travel_provider: bool,
}

impl OptimizationRequest {
    /// Creates a request with default speed, no loading time and provider lookups enabled
    pub fn new(start_location: Location, deliveries: Vec<Delivery>) -> Self {
        Self {
            start_location,
            deliveries,
            vehicle_speed_kmh: DEFAULT_VEHICLE_SPEED_KMH,
            loading_time_minutes: 0,
            use_travel_provider: true,
        }
    }

    pub fn with_loading_time(mut self, minutes: u32) -> Self {
        self.loading_time_minutes = minutes;
        self
    }

    pub fn with_vehicle_speed(mut self, speed_kmh: f64) -> Self {
        self.vehicle_speed_kmh = speed_kmh;
        self
    }

    /// Checks the business rules and returns a request the engine can run on
    pub fn validate(self) -> Result<ValidatedRequest, RequestError> {
        if self.deliveries.is_empty() {
            return Err(RequestError::NoDeliveries);
        }
        if self.deliveries.len() > MAX_DELIVERIES {
            return Err(RequestError::TooManyDeliveries {
                count: self.deliveries.len(),
                max: MAX_DELIVERIES,
            });
        }
        if !(MIN_VEHICLE_SPEED_KMH..=MAX_VEHICLE_SPEED_KMH).contains(&self.vehicle_speed_kmh) {
            return Err(RequestError::SpeedOutOfRange {
                speed: self.vehicle_speed_kmh,
                min: MIN_VEHICLE_SPEED_KMH,
                max: MAX_VEHICLE_SPEED_KMH,
            });
        }
        if !self.start_location.has_finite_coordinates() {
            return Err(RequestError::InvalidCoordinates {
                address: self.start_location.address().to_string(),
            });
        }

        for (index, delivery) in self.deliveries.iter().enumerate() {
            if !delivery.location.has_finite_coordinates() {
                return Err(RequestError::InvalidCoordinates {
                    address: delivery.location.address().to_string(),
                });
            }
            if delivery.products.is_empty() {
                return Err(RequestError::EmptyDelivery { delivery: index });
            }
            if let Some(product) = delivery
                .products
                .iter()
                .find(|product| product.max_delivery_time_minutes < MIN_PRODUCT_DEADLINE_MINUTES)
            {
                return Err(RequestError::DeadlineTooShort {
                    product: product.name.clone(),
                    minutes: product.max_delivery_time_minutes,
                    min: MIN_PRODUCT_DEADLINE_MINUTES,
                });
            }
        }

        Ok(ValidatedRequest { inner: self })
    }
}

/// A request that passed [`OptimizationRequest::validate`]; the only input the engine accepts
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    inner: OptimizationRequest,
}

impl ValidatedRequest {
    pub fn start_location(&self) -> &Location {
        &self.inner.start_location
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.inner.deliveries
    }

    pub fn delivery_count(&self) -> usize {
        self.inner.deliveries.len()
    }

    pub fn vehicle_speed_kmh(&self) -> f64 {
        self.inner.vehicle_speed_kmh
    }

    pub fn loading_time(&self) -> Minutes {
        f64::from(self.inner.loading_time_minutes)
    }

    pub fn use_travel_provider(&self) -> bool {
        self.inner.use_travel_provider
    }

    /// Location list `[depot, delivery_0, .., delivery_n-1, depot]` shared by all matrices
    pub fn locations(&self) -> Vec<Location> {
        let mut locations = Vec::with_capacity(self.delivery_count() + 2);
        locations.push(self.inner.start_location.clone());
        locations.extend(
            self.inner
                .deliveries
                .iter()
                .map(|delivery| delivery.location.clone()),
        );
        locations.push(self.inner.start_location.clone());
        locations
    }

    /// Binding deadline of every delivery, in delivery order
    pub fn deadlines(&self) -> Vec<Minutes> {
        self.inner
            .deliveries
            .iter()
            .map(Delivery::deadline)
            .collect()
    }

    /// Number of products per type tag
    pub fn product_type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for product in self.inner.deliveries.iter().flat_map(|d| &d.products) {
            *counts.entry(product.product_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_inner(self) -> OptimizationRequest {
        self.inner
    }
}

impl TryFrom<OptimizationRequest> for ValidatedRequest {
    type Error = RequestError;

    fn try_from(request: OptimizationRequest) -> Result<Self, Self::Error> {
        request.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn create_delivery(minutes: u32) -> Delivery {
        Delivery::new(
            Location::new(0.1, 0.1, "Client"),
            vec![Product::new("Lettuce", "vegetables", 10.0, "kg", minutes)],
        )
    }

    fn create_request(deliveries: Vec<Delivery>) -> OptimizationRequest {
        OptimizationRequest::new(Location::new(0.0, 0.0, "Farm"), deliveries)
    }

    #[test]
    fn test_validate_accepts_valid_request() {
        let request = create_request(vec![create_delivery(60), create_delivery(120)])
            .with_loading_time(15)
            .validate()
            .unwrap();

        assert_eq!(request.delivery_count(), 2);
        assert_eq!(request.loading_time(), 15.0);
        assert_eq!(request.locations().len(), 4);
        assert_eq!(request.locations()[0], request.locations()[3]);
        assert_eq!(request.deadlines(), vec![60.0, 120.0]);
    }

    #[test]
    fn test_validate_delivery_count() {
        assert_eq!(
            create_request(Vec::new()).validate().unwrap_err(),
            RequestError::NoDeliveries
        );

        let too_many = (0..21).map(|_| create_delivery(60)).collect();
        assert_eq!(
            create_request(too_many).validate().unwrap_err(),
            RequestError::TooManyDeliveries { count: 21, max: 20 }
        );

        let at_limit = (0..20).map(|_| create_delivery(60)).collect();
        assert!(create_request(at_limit).validate().is_ok());
    }

    #[test]
    fn test_validate_product_deadline() {
        let error = create_request(vec![create_delivery(29)])
            .validate()
            .unwrap_err();
        assert!(matches!(error, RequestError::DeadlineTooShort { minutes: 29, .. }));
    }

    #[test]
    fn test_validate_empty_delivery() {
        let empty = Delivery::new(Location::new(0.1, 0.1, "Client"), Vec::new());
        let error = create_request(vec![create_delivery(60), empty])
            .validate()
            .unwrap_err();
        assert_eq!(error, RequestError::EmptyDelivery { delivery: 1 });
    }

    #[test]
    fn test_validate_speed() {
        for speed in [19.9, 120.5] {
            let error = create_request(vec![create_delivery(60)])
                .with_vehicle_speed(speed)
                .validate()
                .unwrap_err();
            assert!(matches!(error, RequestError::SpeedOutOfRange { .. }));
        }
        assert!(create_request(vec![create_delivery(60)])
            .with_vehicle_speed(120.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        let mut delivery = create_delivery(60);
        delivery.location = Location::new(f64::NAN, 0.0, "Nowhere");
        let error = create_request(vec![delivery]).validate().unwrap_err();
        assert!(matches!(error, RequestError::InvalidCoordinates { .. }));
    }

    #[test]
    fn test_product_type_counts() {
        let mut delivery = create_delivery(60);
        delivery
            .products
            .push(Product::new("Milk", "dairy", 5.0, "l", 90));
        let request = create_request(vec![delivery, create_delivery(60)])
            .validate()
            .unwrap();

        let counts = request.product_type_counts();
        assert_eq!(counts.get("vegetables"), Some(&2));
        assert_eq!(counts.get("dairy"), Some(&1));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "startLocation": {"latitude": 0.0, "longitude": 0.0, "address": "Farm"},
            "deliveries": []
        }"#;
        let request: OptimizationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.vehicle_speed_kmh, 60.0);
        assert_eq!(request.loading_time_minutes, 0);
        assert!(request.use_travel_provider);
    }
}
