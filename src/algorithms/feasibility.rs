// Pre-optimization reachability check

use serde::Serialize;

use crate::models::{Delivery, DeliveryIndex, Minutes, TimeMatrix, DEPOT};

/// Deliveries that miss their deadline even when served first, straight from the depot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityReport {
    pub feasible: bool,
    pub infeasible_deliveries: Vec<DeliveryIndex>,
}

/// Flags every delivery whose direct dispatch (depot -> delivery, plus loading)
/// already exceeds its binding deadline. No ordering can fix such a delivery.
pub fn check_feasibility(
    deliveries: &[Delivery],
    matrix: &TimeMatrix,
    loading_time: Minutes,
) -> FeasibilityReport {
    let infeasible_deliveries: Vec<DeliveryIndex> = deliveries
        .iter()
        .enumerate()
        .filter(|(index, delivery)| {
            let direct_time = matrix.time(DEPOT, index + 1) + loading_time;
            direct_time > delivery.deadline()
        })
        .map(|(index, _)| index)
        .collect();

    FeasibilityReport {
        feasible: infeasible_deliveries.is_empty(),
        infeasible_deliveries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, MatrixSource, Product};

    fn create_delivery(deadline: u32) -> Delivery {
        Delivery::new(
            Location::new(0.0, 0.0, "Client"),
            vec![Product::new("Milk", "dairy", 1.0, "l", deadline)],
        )
    }

    fn create_matrix() -> TimeMatrix {
        TimeMatrix::from_rows(
            vec![
                vec![0.0, 40.0, 100.0, 0.0],
                vec![40.0, 0.0, 30.0, 40.0],
                vec![100.0, 30.0, 0.0, 100.0],
                vec![0.0, 40.0, 100.0, 0.0],
            ],
            MatrixSource::Provider,
        )
        .unwrap()
    }

    #[test]
    fn test_all_reachable() {
        let deliveries = vec![create_delivery(60), create_delivery(120)];
        let report = check_feasibility(&deliveries, &create_matrix(), 10.0);

        assert!(report.feasible);
        assert!(report.infeasible_deliveries.is_empty());
    }

    #[test]
    fn test_loading_time_counts() {
        let deliveries = vec![create_delivery(60), create_delivery(120)];
        let report = check_feasibility(&deliveries, &create_matrix(), 25.0);

        // 100 + 25 > 120, 40 + 25 > 60
        assert!(!report.feasible);
        assert_eq!(report.infeasible_deliveries, vec![0, 1]);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let deliveries = vec![create_delivery(50), create_delivery(110)];
        let report = check_feasibility(&deliveries, &create_matrix(), 10.0);

        assert!(report.feasible);
    }

    #[test]
    fn test_uses_tightest_product() {
        let mut delivery = create_delivery(600);
        delivery
            .products
            .push(Product::new("Fish", "seafood", 1.0, "kg", 35));
        let report = check_feasibility(&[delivery], &create_matrix(), 0.0);

        assert_eq!(report.infeasible_deliveries, vec![0]);
    }
}
