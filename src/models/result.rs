// Result models returned by the optimizer and the spoilage validator

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Delivery, DeliveryIndex, Kilometers, Route};

/// Outcome of a route optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OptimizationResult {
    /// Every delivery can be reached in time by direct dispatch; carries the evolved route
    Feasible {
        route: OptimizedRoute,
        #[serde(rename = "executionTimeMs")]
        execution_time_ms: u64,
    },
    /// Some deliveries miss their deadline even when served first
    Infeasible {
        #[serde(rename = "infeasibleDeliveries")]
        infeasible_deliveries: Vec<DeliveryIndex>,
        reason: String,
        #[serde(rename = "executionTimeMs")]
        execution_time_ms: u64,
    },
}

impl OptimizationResult {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }

    /// The optimized route, if the request was feasible
    pub fn route(&self) -> Option<&OptimizedRoute> {
        match self {
            Self::Feasible { route, .. } => Some(route),
            Self::Infeasible { .. } => None,
        }
    }

    /// Deliveries that failed the pre-check (empty when feasible)
    pub fn infeasible_deliveries(&self) -> &[DeliveryIndex] {
        match self {
            Self::Feasible { .. } => &[],
            Self::Infeasible {
                infeasible_deliveries,
                ..
            } => infeasible_deliveries,
        }
    }

    pub fn execution_time_ms(&self) -> u64 {
        match self {
            Self::Feasible {
                execution_time_ms, ..
            }
            | Self::Infeasible {
                execution_time_ms, ..
            } => *execution_time_ms,
        }
    }
}

/// Represents the best route found by the optimizer with its totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    /// Stop indices starting and ending at the depot
    pub stops: Route,

    /// Deliveries reordered to match `stops`
    pub delivery_order: Vec<Delivery>,

    pub total_distance_km: Kilometers,

    /// Travel plus loading time, rounded up to whole minutes
    pub total_time_minutes: u32,

    /// True when travel times were estimated from straight-line distances
    pub approximate: bool,

    /// Generations actually evolved
    pub generations: usize,
}

/// A product that exceeded its own deadline on a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoiledProduct {
    pub name: String,
    pub delivery_index: DeliveryIndex,
}

impl fmt::Display for SpoiledProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (delivery {})", self.name, self.delivery_index)
    }
}

/// Result of re-simulating a route against product deadlines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoilageReport {
    pub all_products_valid: bool,
    pub spoiled_products: Vec<SpoiledProduct>,
    /// Deliveries with at least one spoiled product, in visiting order
    pub spoiled_deliveries: Vec<DeliveryIndex>,
}
