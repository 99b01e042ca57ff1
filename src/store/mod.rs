//! Application state containers.
//!
//! Every store is an explicit handle that the application creates and passes
//! to whoever needs it. There are no process-wide singletons: two sessions in
//! the same process own two independent sets of stores.
//!
//! All stores share the same contract through [`Store`]:
//! - **read** — `get()` clones the value, `read()` borrows it,
//! - **subscribe** — `subscribe()` yields a `watch::Receiver` notified on change,
//! - **mutate** — `set()`, `update()` and `update_if()`.

pub mod auth;
pub mod settings;
pub mod ui;

pub use auth::AuthStore;
pub use settings::SettingsStore;
pub use ui::{UiState, UiStore};

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle to a piece of observable state.
///
/// Clones share the same underlying value.
#[derive(Debug)]
pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Borrow the current value for the duration of `f`.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver notified every time the value changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutate in place; subscribers are notified only when `f` returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

impl<T: Clone> Store<T> {
    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}
