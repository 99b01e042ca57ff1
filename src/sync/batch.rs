//! Micro-batching buffer with a fixed flush window.

use std::time::Duration;
use tokio::time::Instant;

/// Collects items for at most `delay` after the first one.
///
/// The first `push` into an empty batch arms the deadline; later pushes join
/// the open window without moving it. A burst is flushed once, and a steady
/// feed is flushed once per window. The owner polls
/// [`deadline`](Self::deadline) and calls [`take`](Self::take) when it passes.
#[derive(Debug)]
pub struct MicroBatch<T> {
    items: Vec<T>,
    delay: Duration,
    deadline: Option<Instant>,
}

impl<T> MicroBatch<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            items: Vec::new(),
            delay,
            deadline: None,
        }
    }

    pub fn push(&mut self, item: T, now: Instant) {
        self.items.push(item);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain the batch and disarm the timer.
    pub fn take(&mut self) -> Vec<T> {
        self.deadline = None;
        std::mem::take(&mut self.items)
    }
}
