// Error types for request validation, routes, providers and the engine

use crate::models::{DeliveryIndex, StopIndex};

/// Errors returned when building a [`crate::models::ValidatedRequest`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("request has no deliveries")]
    NoDeliveries,
    #[error("too many deliveries for one route: {count} (maximum: {max})")]
    TooManyDeliveries { count: usize, max: usize },
    #[error("delivery {delivery} carries no products")]
    EmptyDelivery { delivery: DeliveryIndex },
    #[error("product '{product}' has a too restrictive delivery time: {minutes} min (minimum: {min} min)")]
    DeadlineTooShort {
        product: String,
        minutes: u32,
        min: u32,
    },
    #[error("vehicle speed must be between {min} and {max} km/h, got {speed}")]
    SpeedOutOfRange { speed: f64, min: f64, max: f64 },
    #[error("location '{address}' has non-finite coordinates")]
    InvalidCoordinates { address: String },
}

/// Errors describing a route that breaks the depot/permutation invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("route must have {expected} stops, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("route must start and end at the depot")]
    MissingDepot,
    #[error("depot appears in the middle of the route at position {position}")]
    DepotMidRoute { position: usize },
    #[error("stop {stop} is out of range")]
    StopOutOfRange { stop: StopIndex },
    #[error("stop {stop} is visited more than once")]
    DuplicateStop { stop: StopIndex },
}

/// Errors raised by a travel-time provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("travel time provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider matrix has {actual} locations, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Computation faults surfaced by the optimization engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),
    #[error("empty location list")]
    EmptyLocations,
    #[error("malformed time matrix: {0}")]
    MalformedMatrix(String),
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}
