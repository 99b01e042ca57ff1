//! Process-wide signal bus.
//!
//! Replaces ad hoc custom DOM events: anything can broadcast a [`Signal`],
//! and listeners (poll synchronizers, UI bridges) react to the ones they care
//! about. The bus is an ordinary value passed to its users.

use tokio::sync::broadcast;

const CAPACITY: usize = 64;

/// Element that can receive keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The chat message composer.
    Composer,
    /// The global search box.
    Search,
    /// Any other text field.
    OtherInput,
    /// Nothing focusable (document body).
    Body,
}

impl FocusTarget {
    /// Whether the target accepts typed text.
    pub fn is_text_field(&self) -> bool {
        matches!(self, Self::Composer | Self::Search | Self::OtherInput)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The product catalog changed server-side.
    CatalogUpdated,
    /// Move keyboard focus.
    Focus(FocusTarget),
    /// Synthetic input event delivered to an element.
    SyntheticInput { target: FocusTarget, data: String },
    Custom(String),
}

impl Signal {
    pub fn name(&self) -> &str {
        match self {
            Self::CatalogUpdated => "catalog-updated",
            Self::Focus(_) => "focus",
            Self::SyntheticInput { .. } => "input",
            Self::Custom(name) => name,
        }
    }
}

/// Broadcast bus for [`Signal`]s. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Signals {
    tx: broadcast::Sender<Signal>,
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

impl Signals {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Broadcast a signal. Returns how many listeners received it.
    pub fn emit(&self, signal: Signal) -> usize {
        tracing::debug!(signal = signal.name(), "emit");
        self.tx.send(signal).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
