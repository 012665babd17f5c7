// Route optimization engine: matrix lookup, pre-check, genetic search and reporting

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::algorithms::feasibility::{check_feasibility, FeasibilityReport};
use crate::algorithms::fitness::FitnessEvaluator;
use crate::algorithms::genetic::GeneticSolver;
use crate::algorithms::spoilage::check_spoilage;
use crate::algorithms::RouteSolver;
use crate::config::OptimizerConfig;
use crate::error::EngineError;
use crate::models::{
    Location, OptimizationResult, OptimizedRoute, Route, SpoilageReport, StopIndex, TimeMatrix,
    ValidatedRequest,
};
use crate::utils::route_metrics::{route_distance, route_time};
use crate::utils::travel_time::{fetch_time_matrix, NoProvider, TravelTimeProvider};

/// Reason attached to results rejected by the pre-check
pub const INFEASIBLE_REASON: &str =
    "Not all products can be delivered within their time limits";

/// Plans single-vehicle routes under spoilage deadlines
pub struct RouteOptimizer<P: TravelTimeProvider = NoProvider> {
    provider: Option<P>,
    config: OptimizerConfig,
    cancellation: Option<Arc<AtomicBool>>,
}

impl RouteOptimizer<NoProvider> {
    /// Creates an optimizer that always estimates travel times from coordinates
    pub fn without_provider(config: OptimizerConfig) -> Self {
        Self {
            provider: None,
            config,
            cancellation: None,
        }
    }
}

impl<P: TravelTimeProvider> RouteOptimizer<P> {
    /// Creates an optimizer asking `provider` for travel times, with the estimator as fallback
    pub fn new(provider: P, config: OptimizerConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
            cancellation: None,
        }
    }

    /// Lets the caller stop a running search; the best route found so far is returned
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Optimizes the delivery order of a request.
    ///
    /// Structurally infeasible requests come back as [`OptimizationResult::Infeasible`];
    /// only computation faults are returned as errors.
    #[instrument(level = "info", skip_all, fields(deliveries = request.delivery_count()))]
    pub fn optimize(&self, request: &ValidatedRequest) -> Result<OptimizationResult, EngineError> {
        let started = Instant::now();
        let solver = self.solver()?;
        log_request(request);

        let locations = request.locations();
        let matrix = self.time_matrix(request, &locations)?;
        let loading_time = request.loading_time();

        let feasibility = precheck(request, &matrix);
        if !feasibility.feasible {
            return Ok(OptimizationResult::Infeasible {
                infeasible_deliveries: feasibility.infeasible_deliveries,
                reason: INFEASIBLE_REASON.to_string(),
                execution_time_ms: elapsed_ms(started),
            });
        }

        let evaluator = FitnessEvaluator::new(
            &matrix,
            request.deliveries(),
            loading_time,
            self.config.penalty_weight,
        );
        let evolution = solver.solve(&evaluator);

        let route = Route::from_genome(&evolution.best.genome);
        let total_time = route_time(&route, &matrix, loading_time);
        let total_distance_km = route_distance(&route, &locations);
        let delivery_order = route
            .delivery_order()
            .map(|index| request.deliveries()[index].clone())
            .collect();

        let optimized = OptimizedRoute {
            stops: route,
            delivery_order,
            total_distance_km,
            total_time_minutes: total_time.ceil() as u32,
            approximate: matrix.is_approximate(),
            generations: evolution.generations,
        };
        let execution_time_ms = elapsed_ms(started);

        info!(
            distance_km = optimized.total_distance_km,
            time_minutes = optimized.total_time_minutes,
            cost = evolution.best.cost,
            generations = evolution.generations,
            execution_time_ms,
            "route optimized"
        );

        Ok(OptimizationResult::Feasible {
            route: optimized,
            execution_time_ms,
        })
    }

    /// Runs only the direct-dispatch pre-check, without searching for a route
    #[instrument(level = "info", skip_all, fields(deliveries = request.delivery_count()))]
    pub fn check_feasibility(
        &self,
        request: &ValidatedRequest,
    ) -> Result<FeasibilityReport, EngineError> {
        let locations = request.locations();
        let matrix = self.time_matrix(request, &locations)?;
        Ok(precheck(request, &matrix))
    }

    /// Re-simulates an existing route (stop indices, depot at both ends) and reports
    /// which products would spoil on it
    #[instrument(level = "info", skip_all, fields(deliveries = request.delivery_count()))]
    pub fn validate_route(
        &self,
        request: &ValidatedRequest,
        stops: &[StopIndex],
    ) -> Result<SpoilageReport, EngineError> {
        let route = Route::try_new(stops.to_vec(), request.delivery_count())?;
        let locations = request.locations();
        let matrix = self.time_matrix(request, &locations)?;

        let report = check_spoilage(
            &route,
            request.deliveries(),
            &matrix,
            request.loading_time(),
        )?;
        if !report.all_products_valid {
            warn!(
                spoiled_deliveries = ?report.spoiled_deliveries,
                spoiled_products = report.spoiled_products.len(),
                "route spoils products"
            );
        }
        Ok(report)
    }

    fn solver(&self) -> Result<GeneticSolver, EngineError> {
        let solver = GeneticSolver::new(self.config.clone())?;
        Ok(match &self.cancellation {
            Some(flag) => solver.with_cancellation(Arc::clone(flag)),
            None => solver,
        })
    }

    fn time_matrix(
        &self,
        request: &ValidatedRequest,
        locations: &[Location],
    ) -> Result<TimeMatrix, EngineError> {
        let provider = self
            .provider
            .as_ref()
            .filter(|_| request.use_travel_provider());
        let matrix = fetch_time_matrix(provider, locations, request.vehicle_speed_kmh())?;
        matrix.ensure_covers(request.delivery_count())?;
        debug!(source = ?matrix.source(), locations = matrix.len(), "time matrix ready");
        Ok(matrix)
    }
}

fn precheck(request: &ValidatedRequest, matrix: &TimeMatrix) -> FeasibilityReport {
    let report = check_feasibility(request.deliveries(), matrix, request.loading_time());
    if !report.feasible {
        warn!(
            infeasible = ?report.infeasible_deliveries,
            "deliveries cannot meet their deadline even by direct dispatch"
        );
    }
    report
}

fn log_request(request: &ValidatedRequest) {
    info!(
        start = request.start_location().address(),
        deliveries = request.delivery_count(),
        vehicle_speed_kmh = request.vehicle_speed_kmh(),
        loading_time_minutes = request.loading_time(),
        use_travel_provider = request.use_travel_provider(),
        product_types = ?request.product_type_counts(),
        "optimization request"
    );
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::models::{Delivery, MatrixSource, OptimizationRequest, Product};

    /// Provider returning a fixed matrix regardless of the locations
    struct FixedMatrix(Vec<Vec<f64>>);

    impl TravelTimeProvider for FixedMatrix {
        fn travel_times(&self, _locations: &[Location]) -> Result<TimeMatrix, ProviderError> {
            TimeMatrix::from_rows(self.0.clone(), MatrixSource::Provider)
                .map_err(|e| ProviderError::Unavailable(e.to_string()))
        }
    }

    fn create_request(deadlines: &[u32], loading: u32) -> ValidatedRequest {
        let deliveries = deadlines
            .iter()
            .enumerate()
            .map(|(i, &minutes)| {
                Delivery::new(
                    Location::new(0.01 * (i + 1) as f64, 0.0, format!("Client {}", i)),
                    vec![Product::new("Milk", "dairy", 1.0, "l", minutes)],
                )
            })
            .collect();
        OptimizationRequest::new(Location::new(0.0, 0.0, "Farm"), deliveries)
            .with_loading_time(loading)
            .validate()
            .unwrap()
    }

    fn create_config() -> OptimizerConfig {
        OptimizerConfig::default().with_seed(17).with_max_generations(100)
    }

    fn create_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 60.0, 90.0, 0.0],
            vec![60.0, 0.0, 75.0, 60.0],
            vec![90.0, 75.0, 0.0, 90.0],
            vec![0.0, 60.0, 90.0, 0.0],
        ]
    }

    #[test]
    fn test_optimize_with_provider() {
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());
        let result = optimizer.optimize(&create_request(&[600, 600], 15)).unwrap();

        let route = result.route().unwrap();
        assert_eq!(route.stops.len(), 4);
        assert_eq!(route.total_time_minutes, 255);
        assert!(!route.approximate);
        assert_eq!(route.delivery_order.len(), 2);
    }

    #[test]
    fn test_deadlines_drive_the_order() {
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());
        // delivery 1 must be served first (90 + 15 <= 110), then delivery 0
        let result = optimizer.optimize(&create_request(&[600, 110], 15)).unwrap();

        let route = result.route().unwrap();
        assert_eq!(route.stops.stops(), &[0, 2, 1, 0]);
        assert_eq!(route.delivery_order[0].location.address(), "Client 1");
    }

    #[test]
    fn test_infeasible_request() {
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());
        let result = optimizer.optimize(&create_request(&[600, 100], 15)).unwrap();

        assert!(!result.is_feasible());
        assert_eq!(result.infeasible_deliveries(), &[1]);
        match result {
            OptimizationResult::Infeasible { reason, .. } => assert_eq!(reason, INFEASIBLE_REASON),
            OptimizationResult::Feasible { .. } => panic!("expected infeasible result"),
        }
    }

    #[test]
    fn test_check_feasibility_only() {
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());

        let report = optimizer.check_feasibility(&create_request(&[600, 100], 15)).unwrap();
        assert!(!report.feasible);
        assert_eq!(report.infeasible_deliveries, vec![1]);

        let report = optimizer.check_feasibility(&create_request(&[600, 600], 15)).unwrap();
        assert!(report.feasible);
        assert!(report.infeasible_deliveries.is_empty());
    }

    #[test]
    fn test_check_feasibility_uses_fallback() {
        // no provider: straight-line estimate for deliveries about 1 km away
        let optimizer = RouteOptimizer::without_provider(create_config());
        let report = optimizer.check_feasibility(&create_request(&[30, 30], 0)).unwrap();

        assert!(report.feasible);
    }

    #[test]
    fn test_provider_failure_falls_back() {
        // wrong dimension: the provider fails and the estimator takes over
        let optimizer = RouteOptimizer::new(FixedMatrix(vec![vec![0.0]]), create_config());
        let result = optimizer.optimize(&create_request(&[600, 600], 0)).unwrap();

        assert!(result.route().unwrap().approximate);
    }

    #[test]
    fn test_provider_disabled_by_request() {
        let mut request = create_request(&[600, 600], 0).into_inner();
        request.use_travel_provider = false;
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());

        let result = optimizer.optimize(&request.validate().unwrap()).unwrap();
        assert!(result.route().unwrap().approximate);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = OptimizerConfig {
            population_size: 0,
            ..Default::default()
        };
        let optimizer = RouteOptimizer::without_provider(config);

        let result = optimizer.optimize(&create_request(&[600], 0));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_route() {
        let optimizer = RouteOptimizer::new(FixedMatrix(create_matrix()), create_config());
        let request = create_request(&[600, 110], 15);

        let late = optimizer.validate_route(&request, &[0, 1, 2, 0]).unwrap();
        assert_eq!(late.spoiled_deliveries, vec![1]);

        let on_time = optimizer.validate_route(&request, &[0, 2, 1, 0]).unwrap();
        assert!(on_time.all_products_valid);
    }

    #[test]
    fn test_validate_route_rejects_broken_route() {
        let optimizer = RouteOptimizer::without_provider(create_config());
        let request = create_request(&[600, 600], 0);

        let result = optimizer.validate_route(&request, &[0, 1, 1, 0]);
        assert!(matches!(result, Err(EngineError::Route(_))));
    }
}
