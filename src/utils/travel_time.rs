// Travel time sources: the provider seam, the great-circle estimator and
// precomputed matrices loaded from disk

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EngineError, ProviderError};
use crate::models::{Location, MatrixSource, Minutes, TimeMatrix};
use crate::utils::distance::{haversine_distance, travel_minutes};

/// Source of pairwise travel times between locations
pub trait TravelTimeProvider: Send + Sync {
    /// Returns a square matrix in minutes with the same ordering as `locations`
    fn travel_times(&self, locations: &[Location]) -> Result<TimeMatrix, ProviderError>;
}

impl<P: TravelTimeProvider + ?Sized> TravelTimeProvider for Box<P> {
    fn travel_times(&self, locations: &[Location]) -> Result<TimeMatrix, ProviderError> {
        (**self).travel_times(locations)
    }
}

/// Estimates travel times from straight-line (great-circle) distances at a constant speed
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimator {
    speed_kmh: f64,
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Builds the estimated matrix; never fails for a non-empty location list
    pub fn estimate(&self, locations: &[Location]) -> Result<TimeMatrix, EngineError> {
        if locations.is_empty() {
            return Err(EngineError::EmptyLocations);
        }

        let rows: Vec<Vec<Minutes>> = locations
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, to)| {
                        if i == j {
                            0.0
                        } else {
                            travel_minutes(haversine_distance(from, to), self.speed_kmh)
                        }
                    })
                    .collect()
            })
            .collect();

        TimeMatrix::from_rows(rows, MatrixSource::Estimated)
    }
}

impl TravelTimeProvider for HaversineEstimator {
    fn travel_times(&self, locations: &[Location]) -> Result<TimeMatrix, ProviderError> {
        self.estimate(locations)
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }
}

/// A travel time matrix computed ahead of time, e.g. exported from a mapping service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecomputedMatrix {
    /// Rows of travel times in minutes; `null` marks a leg the service could not price
    minutes: Vec<Vec<Option<Minutes>>>,
}

impl PrecomputedMatrix {
    pub fn new(minutes: Vec<Vec<Option<Minutes>>>) -> Self {
        Self { minutes }
    }

    /// Loads a matrix from a JSON file of the form `{"minutes": [[0, 12.5], [13.0, 0]]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let json_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json_str)?)
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}

impl TravelTimeProvider for PrecomputedMatrix {
    fn travel_times(&self, locations: &[Location]) -> Result<TimeMatrix, ProviderError> {
        if self.minutes.len() != locations.len() {
            return Err(ProviderError::DimensionMismatch {
                expected: locations.len(),
                actual: self.minutes.len(),
            });
        }

        // Missing cells are mapped to a negative value, which the matrix turns into unreachable
        let rows = self
            .minutes
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or(-1.0)).collect())
            .collect();

        TimeMatrix::from_rows(rows, MatrixSource::Provider)
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }
}

/// A provider that is never available; requests always use the estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl TravelTimeProvider for NoProvider {
    fn travel_times(&self, _locations: &[Location]) -> Result<TimeMatrix, ProviderError> {
        Err(ProviderError::Unavailable(
            "no travel time provider configured".to_string(),
        ))
    }
}

/// Asks the provider for a matrix, falling back to the great-circle estimator on any error.
/// Provider faults are logged and never returned.
pub fn fetch_time_matrix<P: TravelTimeProvider + ?Sized>(
    provider: Option<&P>,
    locations: &[Location],
    fallback_speed_kmh: f64,
) -> Result<TimeMatrix, EngineError> {
    if locations.is_empty() {
        return Err(EngineError::EmptyLocations);
    }

    if let Some(provider) = provider {
        match provider.travel_times(locations) {
            Ok(matrix) if matrix.len() == locations.len() => {
                debug!(locations = locations.len(), "travel times from provider");
                return Ok(matrix);
            }
            Ok(matrix) => warn!(
                expected = locations.len(),
                actual = matrix.len(),
                "provider returned a matrix of the wrong size, using straight-line estimate"
            ),
            Err(e) => warn!(error = %e, "travel time provider failed, using straight-line estimate"),
        }
    }

    HaversineEstimator::new(fallback_speed_kmh).estimate(locations)
}
