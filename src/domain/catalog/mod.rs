//! Catalog domain — products offered on the dashboard.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::ProductKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog product.
///
/// Only the sku is contractual; every other field the server sends is kept
/// in `extra` so the UI can render it without an SDK release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: ProductKey,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Product {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.sku.as_str())
    }
}
