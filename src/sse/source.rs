//! Event sources — where a price subscription gets its events from.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use super::codec::SseEvent;
use super::stream::SseStream;
use crate::error::StreamError;
use crate::http::client::redact_token;
use crate::http::BeaconHttp;

/// Stream of decoded events. Dropping it closes the underlying connection.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent, StreamError>> + Send>>;

/// Opens event subscriptions.
///
/// The returned stream connects lazily on first poll and owns the
/// connection.
pub trait EventSourceConnector: Send + Sync + 'static {
    fn open(&self, token: &str, filter: Option<&str>) -> EventStream;
}

/// Server-sent event subscription over HTTP.
#[derive(Clone)]
pub struct HttpEventSource {
    http: BeaconHttp,
}

impl HttpEventSource {
    pub fn new(http: BeaconHttp) -> Self {
        Self { http }
    }
}

impl EventSourceConnector for HttpEventSource {
    fn open(&self, token: &str, filter: Option<&str>) -> EventStream {
        let http = self.http.clone();
        let url = http.price_stream_url(token, filter);

        Box::pin(async_stream::stream! {
            tracing::debug!(url = %redact_token(&url), "Opening event stream");
            let resp = match http.open_event_stream(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(StreamError::from(e));
                    return;
                }
            };
            tracing::info!("Event stream connected");

            let events = SseStream::new(resp.bytes_stream());
            futures_util::pin_mut!(events);
            while let Some(event) = events.next().await {
                yield event;
            }
        })
    }
}
