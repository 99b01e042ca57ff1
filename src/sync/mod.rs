//! Synchronizers — keep local snapshots in step with the server.
//!
//! Two flavors:
//!
//! - **Push** ([`PriceStreamSync`]): one server-sent event subscription,
//!   events coalesced through a [`MicroBatch`] into a bounded history.
//! - **Poll** ([`PollSync`]): periodic whole-snapshot fetches, plus
//!   out-of-cycle refreshes on a [`Signal`](crate::signals::Signal).
//!
//! Both stay idle without an auth token and degrade to "keep the last good
//! state" on any failure.

pub mod batch;
pub mod catalog;
pub mod incidents;
pub mod poll;
pub mod price_stream;

pub use batch::MicroBatch;
pub use catalog::{CatalogSource, CatalogSync};
pub use incidents::{IncidentSource, IncidentSync};
pub use poll::{PollSource, PollSync};
pub use price_stream::{PriceStreamParams, PriceStreamSync};
