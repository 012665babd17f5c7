// Post-hoc spoilage validation of a decided route

use crate::error::EngineError;
use crate::models::{
    Delivery, Minutes, Route, SpoilageReport, SpoiledProduct, TimeMatrix, DEPOT,
};

/// Re-simulates `route` and reports every product that is delivered after its own deadline.
///
/// A delivery is only inspected once its binding (tightest) deadline is exceeded; within
/// it, products with a later deadline that are still fresh are not reported. Fails when the
/// route or the matrix does not match `deliveries`.
pub fn check_spoilage(
    route: &Route,
    deliveries: &[Delivery],
    matrix: &TimeMatrix,
    loading_time: Minutes,
) -> Result<SpoilageReport, EngineError> {
    route.ensure_covers(deliveries.len())?;
    matrix.ensure_covers(deliveries.len())?;

    let mut spoiled_products = Vec::new();
    let mut spoiled_deliveries = Vec::new();
    let mut elapsed = 0.0;
    let mut previous = DEPOT;

    for delivery_index in route.delivery_order() {
        let stop = delivery_index + 1;
        elapsed += matrix.time(previous, stop) + loading_time;
        previous = stop;

        let delivery = &deliveries[delivery_index];
        if elapsed <= delivery.deadline() {
            continue;
        }

        spoiled_deliveries.push(delivery_index);
        spoiled_products.extend(
            delivery
                .products
                .iter()
                .filter(|product| product.is_spoiled_at(elapsed))
                .map(|product| SpoiledProduct {
                    name: product.name.clone(),
                    delivery_index,
                }),
        );
    }

    Ok(SpoilageReport {
        all_products_valid: spoiled_products.is_empty(),
        spoiled_products,
        spoiled_deliveries,
    })
}
