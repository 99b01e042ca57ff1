//! Settings store — seeded from the server, then edited locally.

use tokio::sync::watch;

use super::Store;
use crate::domain::settings::{ChatMode, Settings, Theme};

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Store<Settings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace local settings with the server copy.
    pub fn seed(&self, settings: Settings) {
        self.inner.set(settings);
    }

    pub fn settings(&self) -> Settings {
        self.inner.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.inner.subscribe()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.inner.update_if(|s| {
            let changed = s.theme != theme;
            s.theme = theme;
            changed
        });
    }

    pub fn set_mode(&self, mode: ChatMode) {
        self.inner.update(|s| s.mode = mode);
    }

    pub fn set_streaming(&self, streaming: bool) {
        self.inner.update(|s| s.streaming = streaming);
    }

    pub fn toggle_thinking(&self) {
        self.inner.update(|s| s.show_thinking = !s.show_thinking);
    }

    pub fn toggle_timestamps(&self) {
        self.inner.update(|s| s.show_timestamps = !s.show_timestamps);
    }

    pub fn toggle_model_tag(&self) {
        self.inner.update(|s| s.show_model_tag = !s.show_model_tag);
    }
}
