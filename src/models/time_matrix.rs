// Travel time matrix between all locations of a route

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{Minutes, StopIndex};

/// Travel time used for legs the provider could not price (negative, NaN or missing).
pub const UNREACHABLE_MINUTES: Minutes = 1.0e6;

/// Where a matrix came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixSource {
    /// An external travel-time provider
    Provider,
    /// The great-circle estimator; values are approximate
    Estimated,
}

/// Square matrix of travel times in minutes, indexed like the location list
/// `[depot, delivery_0, .., delivery_n-1, depot]`. Not assumed symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMatrix {
    size: usize,
    values: Vec<Minutes>,
    source: MatrixSource,
}

impl TimeMatrix {
    /// Builds a matrix from rows, replacing unusable cells with [`UNREACHABLE_MINUTES`]
    pub fn from_rows(rows: Vec<Vec<Minutes>>, source: MatrixSource) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::EmptyLocations);
        }

        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(EngineError::MalformedMatrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            values.extend(row.into_iter().map(sanitize));
        }

        Ok(Self {
            size,
            values,
            source,
        })
    }

    /// Number of locations covered by the matrix
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn source(&self) -> MatrixSource {
        self.source
    }

    /// True when the values came from the geometric estimator
    pub fn is_approximate(&self) -> bool {
        self.source == MatrixSource::Estimated
    }

    /// Travel time from one stop to another
    #[inline]
    pub fn time(&self, from: StopIndex, to: StopIndex) -> Minutes {
        self.values[from * self.size + to]
    }

    /// Checks that the matrix covers the depot, `deliveries` stops and the closing depot
    pub fn ensure_covers(&self, deliveries: usize) -> Result<(), EngineError> {
        let expected = deliveries + 2;
        if self.size != expected {
            return Err(EngineError::MalformedMatrix(format!(
                "matrix has {} locations, expected {}",
                self.size, expected
            )));
        }
        Ok(())
    }
}

fn sanitize(value: Minutes) -> Minutes {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        UNREACHABLE_MINUTES
    }
}
