//! Incident synchronizer — polled working set plus acknowledge/resolve.
//!
//! Actions never touch the snapshot directly: a successful write is
//! followed by exactly one full re-fetch, so the local view is always a
//! server response.

use std::future::Future;

use tokio::sync::watch;

use super::poll::{PollSource, PollSync};
use crate::config::SyncConfig;
use crate::domain::incident::{working_set, Incident};
use crate::error::{AuthError, SdkError};
use crate::http::BeaconHttp;
use crate::store::Store;

/// `GET /api/alerts/incidents`, filtered to open and acknowledged incidents.
#[derive(Clone)]
pub struct IncidentSource {
    http: BeaconHttp,
}

impl IncidentSource {
    pub fn new(http: BeaconHttp) -> Self {
        Self { http }
    }
}

impl PollSource for IncidentSource {
    type Snapshot = Vec<Incident>;

    fn name(&self) -> &'static str {
        "incidents"
    }

    fn fetch(&self, token: &str) -> impl Future<Output = Result<Vec<Incident>, SdkError>> + Send {
        let http = self.http.clone();
        let token = token.to_string();
        async move { Ok(working_set(http.get_incidents(&token).await?)) }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Acknowledge,
    Resolve,
}

/// Polled incident working set with write actions.
#[derive(Clone)]
pub struct IncidentSync {
    poll: PollSync<IncidentSource>,
}

impl IncidentSync {
    pub fn new(http: BeaconHttp, config: &SyncConfig) -> Self {
        Self {
            poll: PollSync::new(IncidentSource::new(http), config.poll_interval),
        }
    }

    pub fn incidents(&self) -> Store<Vec<Incident>> {
        self.poll.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Incident>> {
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

    /// `POST .../ack`, then re-fetch.
    pub async fn acknowledge(&self, id: &str) -> Result<(), SdkError> {
        self.act(Action::Acknowledge, id).await
    }

    /// `POST .../resolve`, then re-fetch.
    pub async fn resolve(&self, id: &str) -> Result<(), SdkError> {
        self.act(Action::Resolve, id).await
    }

    async fn act(&self, action: Action, id: &str) -> Result<(), SdkError> {
        let token = self.poll.token().await.ok_or(AuthError::NotAuthenticated)?;
        let http = &self.poll.source().http;

        match action {
            Action::Acknowledge => http.acknowledge_incident(&token, id).await?,
            Action::Resolve => http.resolve_incident(&token, id).await?,
        }
        tracing::debug!(id, ?action, "Incident updated");

        self.poll.refresh().await;
        Ok(())
    }
}
