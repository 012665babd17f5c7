// Fitness model: route time plus a quadratic penalty for missed deadlines

use crate::models::{Delivery, DeliveryIndex, Minutes, Route, TimeMatrix, DEPOT};

/// Cost components of a candidate route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    /// Travel time plus loading time, return leg included
    pub route_time: Minutes,
    /// Sum of `overshoot^2 * weight` over late deliveries
    pub penalty: f64,
}

impl Fitness {
    /// Scalar value minimized by the search
    pub fn cost(&self) -> f64 {
        self.route_time + self.penalty
    }

    pub fn is_on_time(&self) -> bool {
        self.penalty == 0.0
    }
}

/// Evaluates visiting orders against one request's matrix and deadlines.
/// Holds only shared references and copies, so it can be used from many threads.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    matrix: &'a TimeMatrix,
    deadlines: Vec<Minutes>,
    loading_time: Minutes,
    penalty_weight: f64,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        matrix: &'a TimeMatrix,
        deliveries: &[Delivery],
        loading_time: Minutes,
        penalty_weight: f64,
    ) -> Self {
        Self {
            matrix,
            deadlines: deliveries.iter().map(Delivery::deadline).collect(),
            loading_time,
            penalty_weight,
        }
    }

    /// Number of deliveries, i.e. the genome length
    pub fn delivery_count(&self) -> usize {
        self.deadlines.len()
    }

    /// Simulates the route depot -> genome... -> depot
    pub fn evaluate(&self, genome: &[DeliveryIndex]) -> Fitness {
        let mut elapsed = 0.0;
        let mut penalty = 0.0;
        let mut previous = DEPOT;

        for &delivery in genome {
            let stop = delivery + 1;
            elapsed += self.matrix.time(previous, stop) + self.loading_time;

            let deadline = self.deadlines[delivery];
            if elapsed > deadline {
                penalty += (elapsed - deadline).powi(2) * self.penalty_weight;
            }
            previous = stop;
        }
        elapsed += self.matrix.time(previous, DEPOT);

        Fitness {
            route_time: elapsed,
            penalty,
        }
    }

    /// Same as [`Self::evaluate`] for a decoded route
    pub fn evaluate_route(&self, route: &Route) -> Fitness {
        let genome: Vec<DeliveryIndex> = route.delivery_order().collect();
        self.evaluate(&genome)
    }

    pub fn cost(&self, genome: &[DeliveryIndex]) -> f64 {
        self.evaluate(genome).cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, MatrixSource, Product};
    use crate::utils::route_metrics::route_time;

    fn create_matrix() -> TimeMatrix {
        TimeMatrix::from_rows(
            vec![
                vec![0.0, 60.0, 90.0, 0.0],
                vec![60.0, 0.0, 75.0, 60.0],
                vec![90.0, 75.0, 0.0, 90.0],
                vec![0.0, 60.0, 90.0, 0.0],
            ],
            MatrixSource::Provider,
        )
        .unwrap()
    }

    fn create_deliveries(deadlines: [u32; 2]) -> Vec<Delivery> {
        deadlines
            .iter()
            .map(|&minutes| {
                Delivery::new(
                    Location::new(0.0, 0.0, "Client"),
                    vec![Product::new("Cream", "dairy", 1.0, "l", minutes)],
                )
            })
            .collect()
    }

    #[test]
    fn test_on_time_route_has_no_penalty() {
        let matrix = create_matrix();
        let deliveries = create_deliveries([600, 600]);
        let evaluator = FitnessEvaluator::new(&matrix, &deliveries, 15.0, 1000.0);

        let fitness = evaluator.evaluate(&[0, 1]);
        assert_eq!(fitness.route_time, 255.0);
        assert_eq!(fitness.penalty, 0.0);
        assert_eq!(fitness.cost(), 255.0);
        assert!(fitness.is_on_time());
    }

    #[test]
    fn test_quadratic_penalty() {
        let matrix = create_matrix();
        // second stop is reached at 60 + 15 + 75 + 15 = 165, i.e. 5 minutes late
        let deliveries = create_deliveries([600, 160]);
        let evaluator = FitnessEvaluator::new(&matrix, &deliveries, 15.0, 1000.0);

        let fitness = evaluator.evaluate(&[0, 1]);
        assert_eq!(fitness.penalty, 25.0 * 1000.0);
        assert_eq!(fitness.cost(), 255.0 + 25_000.0);
    }

    #[test]
    fn test_penalty_grows_with_overshoot() {
        let matrix = create_matrix();
        let genome = [0, 1];

        let costs: Vec<f64> = [[600, 600], [600, 160], [600, 140], [70, 140]]
            .iter()
            .map(|&deadlines| {
                let deliveries = create_deliveries(deadlines);
                FitnessEvaluator::new(&matrix, &deliveries, 15.0, 1000.0).cost(&genome)
            })
            .collect();

        for pair in costs.windows(2) {
            assert!(pair[0] < pair[1], "{:?}", costs);
        }
    }

    #[test]
    fn test_matches_route_time() {
        let matrix = create_matrix();
        let deliveries = create_deliveries([600, 600]);
        let evaluator = FitnessEvaluator::new(&matrix, &deliveries, 7.0, 1000.0);

        for genome in [[0, 1], [1, 0]] {
            let route = Route::from_genome(&genome);
            assert_eq!(
                evaluator.evaluate(&genome).route_time,
                route_time(&route, &matrix, 7.0)
            );
            assert_eq!(evaluator.evaluate_route(&route), evaluator.evaluate(&genome));
        }
    }

    #[test]
    fn test_asymmetric_matrix() {
        let matrix = TimeMatrix::from_rows(
            vec![
                vec![0.0, 10.0, 50.0],
                vec![20.0, 0.0, 10.0],
                vec![10.0, 0.0, 0.0],
            ],
            MatrixSource::Provider,
        )
        .unwrap();
        let deliveries = vec![Delivery::new(
            Location::new(0.0, 0.0, "Client"),
            vec![Product::new("Cream", "dairy", 1.0, "l", 60)],
        )];
        let evaluator = FitnessEvaluator::new(&matrix, &deliveries, 0.0, 1000.0);

        // out on row 0, back on row 1
        assert_eq!(evaluator.evaluate(&[0]).route_time, 30.0);
    }
}
