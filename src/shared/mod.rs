//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── ProductKey ──────────────────────────────────────────────────────────────

/// Newtype for product identifiers (SKUs, e.g. `"SKU-1042"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey(String);

impl ProductKey {
    /// Key used when a price payload carries no sku.
    pub const DEFAULT: &'static str = "default";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The sentinel key for unattributed price points.
    pub fn unspecified() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for ProductKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProductKey(s.to_string()))
    }
}

impl Serialize for ProductKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ProductKey(s))
    }
}

// ─── Time ────────────────────────────────────────────────────────────────────

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key_serde_transparent() {
        let key = ProductKey::from("SKU-1");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"SKU-1\"");
        let back: ProductKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_unspecified_key() {
        assert_eq!(ProductKey::unspecified().as_str(), "default");
    }

    #[test]
    fn test_now_ms_is_positive() {
        assert!(now_ms() > 1_600_000_000_000);
    }
}
