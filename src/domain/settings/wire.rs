//! Wire types for settings.

use super::Settings;
use serde::Deserialize;

/// `GET /api/settings` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsResponse {
    #[serde(default)]
    pub settings: Settings,
}
