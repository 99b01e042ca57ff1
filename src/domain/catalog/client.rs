//! Catalog sub-client.

use super::Product;
use crate::client::BeaconClient;
use crate::error::SdkError;

/// Sub-client for catalog operations.
pub struct Catalog<'a> {
    pub(crate) client: &'a BeaconClient,
}

impl<'a> Catalog<'a> {
    /// Fetch the full product list (never cached).
    pub async fn products(&self, token: &str) -> Result<Vec<Product>, SdkError> {
        Ok(self.client.http.get_products(token).await?.products)
    }

    /// A poll synchronizer for the catalog, refreshed on `catalog-updated`.
    #[cfg(feature = "native")]
    pub fn synchronizer(&self, signals: &crate::signals::Signals) -> crate::sync::CatalogSync {
        crate::sync::CatalogSync::new(
            self.client.http.clone(),
            &self.client.sync_config,
            signals.clone(),
        )
    }
}
