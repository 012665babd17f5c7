// Route reductions: total time and total distance of a finished route

use crate::models::{Kilometers, Location, Minutes, Route, TimeMatrix};

/// Total route time: every travel leg plus the loading time after each leg
/// except the final return to the depot
pub fn route_time(route: &Route, matrix: &TimeMatrix, loading_time: Minutes) -> Minutes {
    let leg_count = route.len().saturating_sub(1);

    route
        .legs()
        .enumerate()
        .map(|(i, (from, to))| {
            let loading = if i + 1 < leg_count { loading_time } else { 0.0 };
            matrix.time(from, to) + loading
        })
        .sum()
}

/// Total great-circle distance along the route in kilometres
pub fn route_distance(route: &Route, locations: &[Location]) -> Kilometers {
    route
        .legs()
        .map(|(from, to)| locations[from].distance_to(&locations[to]))
        .sum()
}
