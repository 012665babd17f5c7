// Route model: an ordered sequence of stops starting and ending at the depot

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::models::{DeliveryIndex, StopIndex};

/// Index of the depot in the location list
pub const DEPOT: StopIndex = 0;

/// Represents a complete route `[0, s_1, .., s_n, 0]` where stop `i + 1`
/// is delivery `i`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<StopIndex>", try_from = "Vec<StopIndex>")]
pub struct Route(Vec<StopIndex>);

impl Route {
    /// Decodes a genome (a permutation of delivery indices) into a route
    pub fn from_genome(genome: &[DeliveryIndex]) -> Self {
        let mut stops = Vec::with_capacity(genome.len() + 2);
        stops.push(DEPOT);
        stops.extend(genome.iter().map(|delivery| delivery + 1));
        stops.push(DEPOT);
        Self(stops)
    }

    /// Checks an arbitrary stop sequence against the route invariants for
    /// `delivery_count` deliveries
    pub fn try_new(stops: Vec<StopIndex>, delivery_count: usize) -> Result<Self, RouteError> {
        check_stops(&stops, delivery_count)?;
        Ok(Self(stops))
    }

    /// Checks that the route visits exactly the stops of `delivery_count` deliveries
    pub fn ensure_covers(&self, delivery_count: usize) -> Result<(), RouteError> {
        check_stops(&self.0, delivery_count)
    }

    /// All stops including both depot visits
    pub fn stops(&self) -> &[StopIndex] {
        &self.0
    }

    /// Number of stops, depot visits included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Delivery indices in visiting order
    pub fn delivery_order(&self) -> impl Iterator<Item = DeliveryIndex> + '_ {
        self.0
            .get(1..self.0.len().saturating_sub(1))
            .unwrap_or(&[])
            .iter()
            .map(|stop| stop.saturating_sub(1))
    }

    /// Consecutive (from, to) pairs travelled along the route
    pub fn legs(&self) -> impl Iterator<Item = (StopIndex, StopIndex)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

}

impl From<Route> for Vec<StopIndex> {
    fn from(route: Route) -> Self {
        route.0
    }
}

/// A deserialized route must be a full route over `len - 2` deliveries
impl TryFrom<Vec<StopIndex>> for Route {
    type Error = RouteError;

    fn try_from(stops: Vec<StopIndex>) -> Result<Self, Self::Error> {
        let delivery_count = stops.len().saturating_sub(2);
        Self::try_new(stops, delivery_count)
    }
}

fn check_stops(stops: &[StopIndex], delivery_count: usize) -> Result<(), RouteError> {
    let expected = delivery_count + 2;
    if stops.len() != expected {
        return Err(RouteError::WrongLength {
            expected,
            actual: stops.len(),
        });
    }
    if stops[0] != DEPOT || stops[stops.len() - 1] != DEPOT {
        return Err(RouteError::MissingDepot);
    }

    let mut seen = vec![false; delivery_count + 1];
    for (position, &stop) in stops[1..stops.len() - 1].iter().enumerate() {
        if stop == DEPOT {
            return Err(RouteError::DepotMidRoute {
                position: position + 1,
            });
        }
        if stop > delivery_count {
            return Err(RouteError::StopOutOfRange { stop });
        }
        if seen[stop] {
            return Err(RouteError::DuplicateStop { stop });
        }
        seen[stop] = true;
    }

    Ok(())
}
