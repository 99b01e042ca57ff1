//! Live session — the synchronizers wired to the auth store.
//!
//! A [`LiveSession`] owns the catalog and incident pollers and the price
//! stream, and follows [`AuthStore`]: every token change is pushed to all
//! three, and each newly seen token seeds the [`SettingsStore`] from the
//! server in the background. Losing the token tears everything down.
//!
//! Price stream updates from both sides run under the `stream_options` lock,
//! so each one reads the token and options as they stand when it applies.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::BeaconClient;
use crate::domain::catalog::Product;
use crate::domain::incident::Incident;
use crate::domain::price::PriceHistoryState;
use crate::error::SdkError;
use crate::http::BeaconHttp;
use crate::signals::Signals;
use crate::store::{AuthStore, SettingsStore, Store};
use crate::sync::{CatalogSync, IncidentSync, PriceStreamParams, PriceStreamSync};

/// Caller-controlled half of the price stream parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StreamOptions {
    running: bool,
    filter: Option<String>,
}

pub struct LiveSession {
    auth: AuthStore,
    catalog: CatalogSync,
    incidents: IncidentSync,
    prices: PriceStreamSync,
    stream_options: Arc<async_lock::Mutex<StreamOptions>>,
    follower: async_lock::Mutex<Option<JoinHandle<()>>>,
}

impl LiveSession {
    /// Build the synchronizers and start following `auth`.
    ///
    /// The price stream starts stopped; enable it with
    /// [`set_price_stream`](Self::set_price_stream).
    pub fn start(client: &BeaconClient, auth: AuthStore, signals: Signals, settings: SettingsStore) -> Self {
        let catalog = client.catalog().synchronizer(&signals);
        let incidents = client.incidents().synchronizer();
        let prices = client.prices().synchronizer();
        let stream_options = Arc::new(async_lock::Mutex::new(StreamOptions::default()));

        let follower = tokio::spawn(follow_auth(
            auth.subscribe(),
            Followers {
                http: client.http().clone(),
                settings,
                catalog: catalog.clone(),
                incidents: incidents.clone(),
                prices: prices.clone(),
                stream_options: Arc::clone(&stream_options),
            },
        ));

        Self {
            auth,
            catalog,
            incidents,
            prices,
            stream_options,
            follower: async_lock::Mutex::new(Some(follower)),
        }
    }

    /// Turn the price stream on or off, optionally filtered to one sku.
    pub async fn set_price_stream(&self, running: bool, filter: Option<String>) {
        let mut options = self.stream_options.lock().await;
        *options = StreamOptions { running, filter };
        self.prices
            .update(price_params(&options, self.auth.token()))
            .await;
    }

    pub fn products(&self) -> Store<Vec<Product>> {
        self.catalog.products()
    }

    pub fn incidents(&self) -> Store<Vec<Incident>> {
        self.incidents.incidents()
    }

    pub fn price_history(&self) -> Store<PriceHistoryState> {
        self.prices.history()
    }

    pub fn catalog_sync(&self) -> &CatalogSync {
        &self.catalog
    }

    pub fn incident_sync(&self) -> &IncidentSync {
        &self.incidents
    }

    pub fn price_sync(&self) -> &PriceStreamSync {
        &self.prices
    }

    pub async fn acknowledge_incident(&self, id: &str) -> Result<(), SdkError> {
        self.incidents.acknowledge(id).await
    }

    pub async fn resolve_incident(&self, id: &str) -> Result<(), SdkError> {
        self.incidents.resolve(id).await
    }

    /// Stop following the auth store and tear every synchronizer down.
    pub async fn shutdown(&self) {
        if let Some(follower) = self.follower.lock().await.take() {
            follower.abort();
            let _ = follower.await;
        }
        self.prices.stop().await;
        self.catalog.stop().await;
        self.incidents.stop().await;
        tracing::info!("Live session shut down");
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.get_mut().take() {
            follower.abort();
        }
    }
}

fn price_params(options: &StreamOptions, token: Option<String>) -> PriceStreamParams {
    PriceStreamParams::new(options.running, token, options.filter.clone())
}

struct Followers {
    http: BeaconHttp,
    settings: SettingsStore,
    catalog: CatalogSync,
    incidents: IncidentSync,
    prices: PriceStreamSync,
    stream_options: Arc<async_lock::Mutex<StreamOptions>>,
}

/// Aborts the wrapped task when dropped or replaced.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn follow_auth(mut token_rx: watch::Receiver<Option<String>>, f: Followers) {
    let mut current: Option<String> = None;
    let mut settings_seed: Option<AbortOnDrop> = None;

    loop {
        let token = token_rx.borrow_and_update().clone();

        if token != current {
            match &token {
                Some(_) => tracing::debug!("Auth token changed, resyncing"),
                None => tracing::debug!("Auth token cleared, stopping synchronizers"),
            }
            // A seed still in flight belongs to the previous token.
            drop(settings_seed.take());

            f.catalog.set_token(token.clone()).await;
            f.incidents.set_token(token.clone()).await;
            {
                let options = f.stream_options.lock().await;
                f.prices.update(price_params(&options, token.clone())).await;
            }

            settings_seed = token.clone().map(|token| {
                let (http, settings) = (f.http.clone(), f.settings.clone());
                AbortOnDrop(tokio::spawn(async move {
                    seed_settings(&http, &settings, &token).await;
                }))
            });
            current = token;
        }

        if token_rx.changed().await.is_err() {
            break;
        }
    }
}

async fn seed_settings(http: &BeaconHttp, settings: &SettingsStore, token: &str) {
    match http.get_settings(token).await {
        Ok(resp) => {
            settings.seed(resp.settings);
            tracing::debug!("Settings seeded from server");
        }
        Err(e) => tracing::warn!("Failed to load settings: {}", e),
    }
}
