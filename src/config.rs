// Tunable parameters of the route optimizer

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;

pub const POPULATION_SIZE: usize = 100;
pub const MAX_GENERATIONS: usize = 5000;
pub const CROSSOVER_PROBABILITY: f64 = 0.65;
pub const MUTATION_PROBABILITY: f64 = 0.15;
pub const TOURNAMENT_SIZE: usize = 3;
pub const ELITE_COUNT: usize = 2;
pub const PENALTY_WEIGHT: f64 = 1000.0;

/// Genetic search and penalty parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Probability that a mating event recombines its parents
    pub crossover_probability: f64,
    /// Probability that an offspring gets a swap mutation
    pub mutation_probability: f64,
    pub tournament_size: usize,
    /// Best individuals carried over unchanged; at least one is always kept
    pub elite_count: usize,
    /// Multiplier of the squared deadline overshoot
    pub penalty_weight: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Wall-clock budget for the search
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: POPULATION_SIZE,
            max_generations: MAX_GENERATIONS,
            crossover_probability: CROSSOVER_PROBABILITY,
            mutation_probability: MUTATION_PROBABILITY,
            tournament_size: TOURNAMENT_SIZE,
            elite_count: ELITE_COUNT,
            penalty_weight: PENALTY_WEIGHT,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Loads a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json_str = fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json_str)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.population_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(EngineError::InvalidConfig(
                "max generations must be positive".to_string(),
            ));
        }
        for (name, probability) in [
            ("crossover", self.crossover_probability),
            ("mutation", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&probability) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} probability must be between 0.0 and 1.0, got {}",
                    name, probability
                )));
            }
        }
        if self.tournament_size == 0 {
            return Err(EngineError::InvalidConfig(
                "tournament size must be positive".to_string(),
            ));
        }
        if self.penalty_weight.is_nan() || self.penalty_weight < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "penalty weight must be non-negative, got {}",
                self.penalty_weight
            )));
        }
        Ok(())
    }
}
