//! Low-level HTTP client — `BeaconHttp`.
//!
//! One method per API endpoint. Returns wire types (unwrapping of envelopes
//! happens in the domain sub-clients). Every endpoint authenticates with a
//! `token` query parameter. Nothing is retried here; a failed call surfaces
//! its error and the caller waits for its next cycle.

use crate::domain::catalog::wire::ProductsResponse;
use crate::domain::incident::Incident;
use crate::domain::settings::wire::SettingsResponse;
use crate::error::HttpError;
use crate::network::PRICE_STREAM_PATH;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the Beacon REST API.
pub struct BeaconHttp {
    base_url: String,
    client: Client,
    request_timeout: Duration,
}

impl BeaconHttp {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// `request_timeout` bounds REST calls only; the event stream stays open.
    pub fn with_timeout(base_url: &str, request_timeout: Duration) -> Self {
        let builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10);

        // Builder only fails when the TLS backend cannot initialise.
        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("HTTP client builder failed ({}), using defaults", e);
            Client::new()
        });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    pub async fn get_products(&self, token: &str) -> Result<ProductsResponse, HttpError> {
        let url = format!(
            "{}/api/catalog/products?token={}",
            self.base_url,
            urlencoding::encode(token)
        );
        self.get(&url).await
    }

    // ── Alerts ───────────────────────────────────────────────────────────

    pub async fn get_incidents(&self, token: &str) -> Result<Vec<Incident>, HttpError> {
        let url = format!(
            "{}/api/alerts/incidents?token={}",
            self.base_url,
            urlencoding::encode(token)
        );
        self.get(&url).await
    }

    pub async fn acknowledge_incident(&self, token: &str, id: &str) -> Result<(), HttpError> {
        let url = self.incident_action_url(token, id, "ack");
        self.post_empty(&url).await
    }

    pub async fn resolve_incident(&self, token: &str, id: &str) -> Result<(), HttpError> {
        let url = self.incident_action_url(token, id, "resolve");
        self.post_empty(&url).await
    }

    fn incident_action_url(&self, token: &str, id: &str, action: &str) -> String {
        format!(
            "{}/api/alerts/incidents/{}/{}?token={}",
            self.base_url,
            urlencoding::encode(id),
            action,
            urlencoding::encode(token)
        )
    }

    // ── Settings ─────────────────────────────────────────────────────────

    pub async fn get_settings(&self, token: &str) -> Result<SettingsResponse, HttpError> {
        let url = format!(
            "{}/api/settings?token={}",
            self.base_url,
            urlencoding::encode(token)
        );
        self.get(&url).await
    }

    // ── Prices ───────────────────────────────────────────────────────────

    /// `GET /api/prices/stream?sku=<sku>&token=<token>`; `sku` only when filtered.
    pub fn price_stream_url(&self, token: &str, sku: Option<&str>) -> String {
        let mut params = Vec::new();
        if let Some(sku) = sku.filter(|s| !s.is_empty()) {
            params.push(format!("sku={}", urlencoding::encode(sku)));
        }
        params.push(format!("token={}", urlencoding::encode(token)));
        format!("{}{}?{}", self.base_url, PRICE_STREAM_PATH, params.join("&"))
    }

    /// Open the event stream. Never retried, no total timeout.
    pub async fn open_event_stream(&self, url: &str) -> Result<Response, HttpError> {
        let req = self
            .client
            .get(url)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache");
        let resp = req.send().await?;
        check_status(resp).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self.do_request(&Method::GET, url).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn post_empty(&self, url: &str) -> Result<(), HttpError> {
        self.do_request(&Method::POST, url).await?;
        Ok(())
    }

    async fn do_request(&self, method: &Method, url: &str) -> Result<Response, HttpError> {
        let resp = self
            .client
            .request(method.clone(), url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::Reqwest(e)
                }
            })?;
        check_status(resp).await.map_err(|e| {
            tracing::debug!(error = %e, "{} {} failed", method, redact_token(url));
            e
        })
    }
}

async fn check_status(resp: Response) -> Result<Response, HttpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let status_code = status.as_u16();
    let retry_after_ms = resp
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let body_text = resp.text().await.unwrap_or_default();

    match status_code {
        401 => Err(HttpError::Unauthorized),
        404 => Err(HttpError::NotFound(body_text)),
        429 => Err(HttpError::RateLimited { retry_after_ms }),
        400..=499 => Err(HttpError::BadRequest(body_text)),
        _ => Err(HttpError::ServerError {
            status: status_code,
            body: body_text,
        }),
    }
}

/// Strip the token value from a URL before it reaches the logs.
pub(crate) fn redact_token(url: &str) -> String {
    match url.find("token=") {
        Some(start) => {
            let value_start = start + "token=".len();
            let end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[end..])
        }
        None => url.to_string(),
    }
}

impl Clone for BeaconHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            request_timeout: self.request_timeout,
        }
    }
}
