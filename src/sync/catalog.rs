//! Catalog synchronizer — product list, invalidated by `catalog-updated`.

use std::future::Future;

use tokio::sync::watch;

use super::poll::{PollSource, PollSync};
use crate::config::SyncConfig;
use crate::domain::catalog::Product;
use crate::error::SdkError;
use crate::http::BeaconHttp;
use crate::signals::{Signal, Signals};
use crate::store::Store;

/// `GET /api/catalog/products`, unwrapped to the product list.
#[derive(Clone)]
pub struct CatalogSource {
    http: BeaconHttp,
}

impl CatalogSource {
    pub fn new(http: BeaconHttp) -> Self {
        Self { http }
    }
}

impl PollSource for CatalogSource {
    type Snapshot = Vec<Product>;

    fn name(&self) -> &'static str {
        "catalog"
    }

    fn fetch(&self, token: &str) -> impl Future<Output = Result<Vec<Product>, SdkError>> + Send {
        let http = self.http.clone();
        let token = token.to_string();
        async move { Ok(http.get_products(&token).await?.products) }
    }
}

/// Polled product list.
#[derive(Clone)]
pub struct CatalogSync {
    poll: PollSync<CatalogSource>,
}

impl CatalogSync {
    pub fn new(http: BeaconHttp, config: &SyncConfig, signals: Signals) -> Self {
        Self {
            poll: PollSync::with_invalidation(
                CatalogSource::new(http),
                config.poll_interval,
                signals,
                Signal::CatalogUpdated,
            ),
        }
    }

    pub fn products(&self) -> Store<Vec<Product>> {
        self.poll.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.poll.subscribe()
    }

    pub async fn set_token(&self, token: Option<String>) {
        self.poll.set_token(token).await;
    }

    pub async fn token(&self) -> Option<String> {
        self.poll.token().await
    }

    pub async fn refresh(&self) {
        self.poll.refresh().await;
    }

    pub async fn stop(&self) {
        self.poll.stop().await;
    }
}
