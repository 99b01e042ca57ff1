//! # Beacon SDK
//!
//! Client-side engine for the Beacon dashboard: application state stores,
//! a live price stream, polled catalog and incident snapshots, global
//! keyboard shortcuts and chat export.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: types, domain models, wire parsing, configuration (always available)
//! 2. **HTTP API**: `BeaconHttp`, one method per endpoint
//! 3. **High-Level Client**: `BeaconClient` with nested sub-clients
//! 4. **Runtime**: stores, signal bus, server-sent events, synchronizers,
//!    live session and shortcuts (native, tokio)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beacon_sdk::prelude::*;
//!
//! let client = BeaconClient::builder()
//!     .base_url("http://localhost:8080")
//!     .build()?;
//!
//! let auth = AuthStore::with_token("secret");
//! let session = LiveSession::start(&client, auth, Signals::new(), SettingsStore::new());
//! session.set_price_stream(true, None).await;
//!
//! let mut prices = session.price_history().subscribe();
//! prices.changed().await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Synchronizer tunables and environment loading.
pub mod config;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// Low-level HTTP client.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `BeaconClient`, the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 4: Runtime ─────────────────────────────────────────────────────────

/// Tracing subscriber setup.
#[cfg(feature = "native")]
pub mod logging;

/// Observable application state: auth, settings, UI.
#[cfg(feature = "native")]
pub mod store;

/// Process-wide signal bus.
#[cfg(feature = "native")]
pub mod signals;

/// Server-sent events: decoder, stream adapter, event sources.
#[cfg(feature = "native")]
pub mod sse;

/// Push and poll synchronizers.
#[cfg(feature = "native")]
pub mod sync;

/// Synchronizers wired to the auth store.
#[cfg(feature = "native")]
pub mod session;

/// Global keyboard shortcut table.
#[cfg(feature = "native")]
pub mod shortcuts;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::ProductKey;

    // Domain types
    pub use crate::domain::catalog::Product;
    pub use crate::domain::chat::export::thread_to_markdown;
    pub use crate::domain::chat::{ChatMessage, Role};
    pub use crate::domain::incident::{Incident, IncidentStatus, Severity};
    pub use crate::domain::price::{PriceHistoryState, PricePoint};
    pub use crate::domain::settings::{ChatMode, Settings, Theme};

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, StreamError};

    // Configuration
    pub use crate::config::{BeaconConfig, SyncConfig};
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        BeaconClient, BeaconClientBuilder, CatalogClient, IncidentsClient, PricesClient,
        SettingsSubClient,
    };

    // Runtime
    #[cfg(feature = "native")]
    pub use crate::session::LiveSession;
    #[cfg(feature = "native")]
    pub use crate::shortcuts::{KeyEvent, KeyOutcome, Shortcut, ShortcutTable};
    #[cfg(feature = "native")]
    pub use crate::signals::{FocusTarget, Signal, Signals};
    #[cfg(feature = "native")]
    pub use crate::store::{AuthStore, SettingsStore, Store, UiState, UiStore};
    #[cfg(feature = "native")]
    pub use crate::sync::{
        CatalogSync, IncidentSync, PollSource, PollSync, PriceStreamParams, PriceStreamSync,
    };
}
