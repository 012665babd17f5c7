// Delivery model: a stop on the route carrying one or more products

use serde::{Deserialize, Serialize};

use crate::models::{Location, Minutes, Product};

/// Represents a delivery stop with its products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub location: Location,

    /// Products handed over at this stop (never empty in a validated request)
    pub products: Vec<Product>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,

    /// 1 = high, 2 = medium, 3 = low
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl Delivery {
    /// Creates a new delivery for the given location and products
    pub fn new(location: Location, products: Vec<Product>) -> Self {
        Self {
            location,
            products,
            customer_name: None,
            customer_phone: None,
            delivery_notes: None,
            priority: None,
        }
    }

    /// Sets the customer name shown alongside the stop
    pub fn with_customer<S: Into<String>>(mut self, customer_name: S) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    /// The binding deadline of this stop: the earliest-spoiling product.
    /// `None` means "no limit" and only happens for a delivery without products.
    pub fn min_delivery_time_limit(&self) -> Option<u32> {
        self.products
            .iter()
            .map(|product| product.max_delivery_time_minutes)
            .min()
    }

    /// Deadline as minutes, with an infinite value standing for "no limit"
    pub fn deadline(&self) -> Minutes {
        self.min_delivery_time_limit()
            .map_or(f64::INFINITY, f64::from)
    }
}
