//! Settings domain — per-user display and chat preferences.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use serde::{Deserialize, Serialize};

/// User preferences served by `GET /api/settings`.
///
/// Every field has a default so partial payloads still seed the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub show_thinking: bool,
    pub show_timestamps: bool,
    pub show_model_tag: bool,
    pub show_metadata_panel: bool,
    pub theme: Theme,
    pub streaming: bool,
    pub mode: ChatMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_thinking: false,
            show_timestamps: true,
            show_model_tag: true,
            show_metadata_panel: false,
            theme: Theme::System,
            streaming: true,
            mode: ChatMode::default(),
        }
    }
}

/// Color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    #[serde(other)]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chat mode selected by the user. Server-defined, kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMode(String);

impl ChatMode {
    pub fn new(mode: impl Into<String>) -> Self {
        Self(mode.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChatMode {
    fn default() -> Self {
        Self("chat".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payload_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"theme":"dark","show_thinking":true}"#).unwrap();
        assert_eq!(s.theme, Theme::Dark);
        assert!(s.show_thinking);
        assert!(s.show_timestamps);
        assert_eq!(s.mode.as_str(), "chat");
    }

    #[test]
    fn test_unknown_theme_falls_back_to_system() {
        let s: Settings = serde_json::from_str(r#"{"theme":"solarized"}"#).unwrap();
        assert_eq!(s.theme, Theme::System);
    }
}
