// Product model representing perishable goods carried by a delivery

use serde::{Deserialize, Serialize};

/// Represents a product with its spoilage deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Name of the product
    pub name: String,

    /// Type tag, e.g. "dairy" or "vegetables"
    #[serde(rename = "type")]
    pub product_type: String,

    pub quantity: f64,

    /// kg, litres, units...
    pub unit: String,

    /// Minutes from route start after which the product is spoiled
    pub max_delivery_time_minutes: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Storage temperature class (refrigerated, ambient, frozen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
}

impl Product {
    /// Creates a new product with the given name, type, amount and deadline
    pub fn new<N: Into<String>, T: Into<String>, U: Into<String>>(
        name: N,
        product_type: T,
        quantity: f64,
        unit: U,
        max_delivery_time_minutes: u32,
    ) -> Self {
        Self {
            name: name.into(),
            product_type: product_type.into(),
            quantity,
            unit: unit.into(),
            max_delivery_time_minutes,
            description: None,
            temperature: None,
        }
    }

    /// Checks whether the product is spoiled after `elapsed` minutes on the road
    pub fn is_spoiled_at(&self, elapsed: f64) -> bool {
        elapsed > f64::from(self.max_delivery_time_minutes)
    }
}
