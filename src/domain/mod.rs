//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains (where relevant):
//! - `mod.rs` — Rich domain types
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `state.rs` — State containers with update methods (for stream-driven data)
//! - `client.rs` — Sub-client with HTTP methods and synchronizer factories

pub mod catalog;
pub mod chat;
pub mod incident;
pub mod price;
pub mod settings;
