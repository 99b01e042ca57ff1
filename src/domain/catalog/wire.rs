//! Wire types for the catalog.

use super::Product;
use serde::{Deserialize, Serialize};

/// `GET /api/catalog/products` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}
