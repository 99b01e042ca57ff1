//! UI store — sidebar, panels and chat streaming flag.

use tokio::sync::watch;

use super::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_open: bool,
    pub metadata_panel_open: bool,
    /// An assistant response is currently being streamed into the thread.
    pub is_streaming: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            metadata_panel_open: false,
            is_streaming: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiStore {
    inner: Store<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UiState {
        self.inner.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.inner.subscribe()
    }

    pub fn toggle_sidebar(&self) {
        self.inner.update(|s| s.sidebar_open = !s.sidebar_open);
    }

    pub fn toggle_metadata_panel(&self) {
        self.inner
            .update(|s| s.metadata_panel_open = !s.metadata_panel_open);
    }

    pub fn set_streaming(&self, streaming: bool) {
        self.inner.update_if(|s| {
            let changed = s.is_streaming != streaming;
            s.is_streaming = streaming;
            changed
        });
    }

    /// Stop the running response stream. Returns `false` if none was running.
    pub fn stop_streaming(&self) -> bool {
        self.inner.update_if(|s| std::mem::replace(&mut s.is_streaming, false))
    }

    pub fn is_streaming(&self) -> bool {
        self.inner.read(|s| s.is_streaming)
    }
}
