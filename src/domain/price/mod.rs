//! Price domain — live price points and per-product history.

#[cfg(feature = "http")]
pub mod client;
pub mod state;
pub mod wire;

use serde::{Deserialize, Serialize};

pub use state::PriceHistoryState;
pub use wire::parse_price_event;

/// A single observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }
}
