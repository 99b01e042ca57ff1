//! High-level client — `BeaconClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared transport and the accessors.

use crate::config::{BeaconConfig, SyncConfig};
use crate::domain::catalog::client::Catalog;
use crate::domain::incident::client::Incidents;
use crate::domain::price::client::Prices;
use crate::domain::settings::client::SettingsClient;
use crate::error::SdkError;
use crate::http::BeaconHttp;

// Re-export sub-client types for convenience.
pub use crate::domain::catalog::client::Catalog as CatalogClient;
pub use crate::domain::incident::client::Incidents as IncidentsClient;
pub use crate::domain::price::client::Prices as PricesClient;
pub use crate::domain::settings::client::SettingsClient as SettingsSubClient;

/// The primary entry point for the Beacon SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.catalog()`, `client.incidents()`, etc. Synchronizers built from
/// the sub-clients share this client's transport and [`SyncConfig`].
#[derive(Clone)]
pub struct BeaconClient {
    pub(crate) http: BeaconHttp,
    pub(crate) sync_config: SyncConfig,
}

impl BeaconClient {
    pub fn builder() -> BeaconClientBuilder {
        BeaconClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn catalog(&self) -> Catalog<'_> {
        Catalog { client: self }
    }

    pub fn incidents(&self) -> Incidents<'_> {
        Incidents { client: self }
    }

    pub fn settings(&self) -> SettingsClient<'_> {
        SettingsClient { client: self }
    }

    pub fn prices(&self) -> Prices<'_> {
        Prices { client: self }
    }

    /// Raw endpoint access.
    pub fn http(&self) -> &BeaconHttp {
        &self.http
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.sync_config
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct BeaconClientBuilder {
    base_url: String,
    sync_config: SyncConfig,
}

impl Default for BeaconClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            sync_config: SyncConfig::default(),
        }
    }
}

impl BeaconClientBuilder {
    /// Start from a loaded [`BeaconConfig`].
    pub fn from_config(config: BeaconConfig) -> Self {
        Self {
            base_url: config.api_url,
            sync_config: config.sync,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn sync_config(mut self, config: SyncConfig) -> Self {
        self.sync_config = config;
        self
    }

    pub fn build(self) -> Result<BeaconClient, SdkError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SdkError::Validation(format!(
                "base url must be http(s): {:?}",
                self.base_url
            )));
        }
        if self.sync_config.history_limit == 0 {
            return Err(SdkError::Validation("history_limit must be at least 1".into()));
        }

        Ok(BeaconClient {
            http: BeaconHttp::with_timeout(&self.base_url, self.sync_config.request_timeout),
            sync_config: self.sync_config,
        })
    }
}
