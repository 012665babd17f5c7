// Models module - exports all model types

mod delivery;
mod location;
mod product;
mod request;
mod result;
mod route;
mod time_matrix;

// Re-export model types
pub use self::delivery::Delivery;
pub use self::location::Location;
pub use self::product::Product;
pub use self::request::{
    OptimizationRequest, ValidatedRequest, DEFAULT_VEHICLE_SPEED_KMH, MAX_DELIVERIES,
    MAX_VEHICLE_SPEED_KMH, MIN_PRODUCT_DEADLINE_MINUTES, MIN_VEHICLE_SPEED_KMH,
};
pub use self::result::{OptimizationResult, OptimizedRoute, SpoilageReport, SpoiledProduct};
pub use self::route::{Route, DEPOT};
pub use self::time_matrix::{MatrixSource, TimeMatrix, UNREACHABLE_MINUTES};

// Common type aliases for improved code readability
pub type Minutes = f64;
pub type Kilometers = f64;
/// Position of a delivery in the request's delivery list (0-based).
pub type DeliveryIndex = usize;
/// Position in the location list `[depot, deliveries.., depot]`; 0 is the depot.
pub type StopIndex = usize;
