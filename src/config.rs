//! Configuration — synchronizer tunables and environment loading.

use std::str::FromStr;
use std::time::Duration;

use crate::error::SdkError;

/// Tunables shared by the push and poll synchronizers.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Quiet period after the last stream event before a batch is flushed.
    pub debounce: Duration,
    /// Maximum number of price points kept per product key.
    pub history_limit: usize,
    /// Period between two fetches of a poll synchronizer.
    pub poll_interval: Duration,
    /// Name of the server-sent event carrying price updates.
    pub price_event: String,
    /// Total timeout for REST requests (never applied to the event stream).
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            history_limit: 50,
            poll_interval: Duration::from_secs(30),
            price_event: "price".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconConfig {
    pub api_url: String,
    pub sync: SyncConfig,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            api_url: crate::network::DEFAULT_API_URL.to_string(),
            sync: SyncConfig::default(),
        }
    }
}

impl BeaconConfig {
    /// Read the configuration from process environment variables.
    ///
    /// | Variable                     | Default                 |
    /// |------------------------------|-------------------------|
    /// | `BEACON_API_URL`             | `http://localhost:8080` |
    /// | `BEACON_DEBOUNCE_MS`         | `100`                   |
    /// | `BEACON_HISTORY_LIMIT`       | `50`                    |
    /// | `BEACON_POLL_INTERVAL_SECS`  | `30`                    |
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SdkError> {
        let mut config = Self::default();

        if let Some(url) = lookup("BEACON_API_URL").filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "BEACON_DEBOUNCE_MS")? {
            config.sync.debounce = Duration::from_millis(ms);
        }
        if let Some(limit) = parse_var::<usize>(&lookup, "BEACON_HISTORY_LIMIT")? {
            if limit == 0 {
                return Err(SdkError::Validation(
                    "BEACON_HISTORY_LIMIT must be at least 1".into(),
                ));
            }
            config.sync.history_limit = limit;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "BEACON_POLL_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(SdkError::Validation(
                    "BEACON_POLL_INTERVAL_SECS must be at least 1".into(),
                ));
            }
            config.sync.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, SdkError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SdkError::Validation(format!("{key}={raw:?}: {e}"))),
    }
}
