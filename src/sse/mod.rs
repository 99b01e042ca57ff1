//! Server-sent events — decoder, stream adapter and event sources.
//!
//! The price feed is a `text/event-stream` response. [`SseDecoder`] parses
//! it incrementally, [`SseStream`] lifts the decoder over a byte stream, and
//! [`EventSourceConnector`] is the seam the price synchronizer opens
//! subscriptions through ([`HttpEventSource`] in production, an in-memory
//! feed in tests).

pub mod codec;
pub mod source;
pub mod stream;

pub use codec::{SseDecoder, SseEvent};
pub use source::{EventSourceConnector, EventStream, HttpEventSource};
pub use stream::SseStream;
