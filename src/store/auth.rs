//! Auth store — owns the session token.
//!
//! Synchronizers only read from it. Login/logout flows write to it.

use tokio::sync::watch;

use super::Store;

/// Token holder shared between the login flow and the synchronizers.
#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    token: Store<Option<String>>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    /// Current token, if any. Empty tokens are treated as absent.
    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read(|t| t.is_some())
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let next = if token.is_empty() { None } else { Some(token) };
        self.token.update_if(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    pub fn clear(&self) {
        self.token.update_if(|current| current.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}
