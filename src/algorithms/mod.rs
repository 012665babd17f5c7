pub mod feasibility;
pub mod fitness;
pub mod genetic;
pub mod optimizer;
pub mod spoilage;

// Common algorithm traits
use crate::algorithms::fitness::FitnessEvaluator;
use crate::algorithms::genetic::Individual;

/// Outcome of a visiting-order search
#[derive(Debug, Clone, PartialEq)]
pub struct Evolution {
    /// Best individual seen during the whole search
    pub best: Individual,

    /// Generations actually completed
    pub generations: usize,

    /// True when cancellation or the time limit ended the search before its budget
    pub stopped_early: bool,
}

/// Trait for delivery-order solvers
pub trait RouteSolver {
    /// Search for the visiting order with the lowest cost under `evaluator`
    fn solve(&self, evaluator: &FitnessEvaluator<'_>) -> Evolution;
}
