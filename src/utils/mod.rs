// Utilities: geometry, travel time sources and route reductions

pub mod distance;
pub mod route_metrics;
pub mod travel_time;
