// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::optimizer::RouteOptimizer;
pub use config::OptimizerConfig;
pub use error::{EngineError, ProviderError, RequestError, RouteError};
pub use models::{
    Delivery, Location, OptimizationRequest, OptimizationResult, Product, Route, SpoilageReport,
    TimeMatrix, ValidatedRequest,
};
pub use utils::travel_time::{HaversineEstimator, PrecomputedMatrix, TravelTimeProvider};
