//! `Stream` adapter from raw byte chunks to decoded events.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use pin_project_lite::pin_project;

use super::codec::{SseDecoder, SseEvent};
use crate::error::StreamError;

pin_project! {
    /// Decodes a stream of byte chunks (e.g. `reqwest::Response::bytes_stream`)
    /// into server-sent events.
    ///
    /// A transport error is yielded once as [`StreamError::Transport`]. An event
    /// still being built when the inner stream ends is discarded.
    pub struct SseStream<S> {
        #[pin]
        inner: S,
        decoder: SseDecoder,
        ready: VecDeque<SseEvent>,
    }
}

impl<S> SseStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            decoder: SseDecoder::new(),
            ready: VecDeque::new(),
        }
    }
}

impl<S, B, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    type Item = Result<SseEvent, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(event) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.ready.extend(this.decoder.feed(chunk.as_ref()));
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(StreamError::Transport(e.to_string()))));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
