//! Incident domain — alert incidents raised by monitoring rules.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::ProductKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Numeric ids are kept as their decimal string.
    #[serde(with = "crate::shared::serde_util::string_or_number")]
    pub id: String,
    #[serde(with = "crate::shared::serde_util::string_or_number")]
    pub rule_id: String,
    pub sku: ProductKey,
    pub status: IncidentStatus,
    #[serde(with = "crate::shared::serde_util::lenient_utc")]
    pub first_seen: DateTime<Utc>,
    #[serde(with = "crate::shared::serde_util::lenient_utc")]
    pub last_seen: DateTime<Utc>,
    pub severity: Severity,
    pub title: String,
}

impl Incident {
    /// Open or acknowledged — still part of the working set.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Incident lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncidentStatus {
    Open,
    Acked,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Acked => "ACKED",
            Self::Resolved => "RESOLVED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Acked)
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Crit,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Crit => "crit",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep only open and acknowledged incidents, in server order.
///
/// The server stays the source of truth for resolved incidents.
pub fn working_set(incidents: Vec<Incident>) -> Vec<Incident> {
    incidents.into_iter().filter(Incident::is_active).collect()
}
