//! Push-subscription synchronizer for the live price feed.
//!
//! Keeps at most one event subscription open, folds incoming `price` events
//! into a bounded per-product history and coalesces bursts: events are
//! buffered in a [`MicroBatch`] and applied as one state update
//! `SyncConfig::debounce` after the first event of the window.
//!
//! Lifecycle follows the parameters, the way a UI effect follows its
//! dependencies: every change of `running`, `token` or `filter` tears the
//! previous subscription down before a new one is opened.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::batch::MicroBatch;
use crate::config::SyncConfig;
use crate::domain::price::{parse_price_event, PriceHistoryState, PricePoint};
use crate::shared::{now_ms, ProductKey};
use crate::sse::{EventSourceConnector, EventStream};
use crate::store::Store;

/// Inputs that decide whether, and to what, the synchronizer is subscribed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceStreamParams {
    pub running: bool,
    pub token: Option<String>,
    /// Restrict the feed to one sku.
    pub filter: Option<String>,
}

impl PriceStreamParams {
    pub fn new(running: bool, token: Option<String>, filter: Option<String>) -> Self {
        Self {
            running,
            token,
            filter,
        }
    }

    fn should_connect(&self) -> bool {
        self.running && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Live price history fed by the price event stream.
///
/// Cloning yields another handle to the same subscription. When the last
/// handle is dropped the subscription is aborted.
#[derive(Clone)]
pub struct PriceStreamSync {
    shared: Arc<Shared>,
}

struct Shared {
    connector: Arc<dyn EventSourceConnector>,
    config: SyncConfig,
    history: Store<PriceHistoryState>,
    active: async_lock::Mutex<Option<Subscription>>,
}

struct Subscription {
    params: PriceStreamParams,
    /// Cleared on teardown; a flush racing the teardown checks it before writing.
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PriceStreamSync {
    pub fn new(connector: Arc<dyn EventSourceConnector>, config: SyncConfig) -> Self {
        let history = Store::new(PriceHistoryState::with_limit(config.history_limit));
        Self {
            shared: Arc::new(Shared {
                connector,
                config,
                history,
                active: async_lock::Mutex::new(None),
            }),
        }
    }

    /// Handle to the accumulated history.
    pub fn history(&self) -> Store<PriceHistoryState> {
        self.shared.history.clone()
    }

    pub fn snapshot(&self) -> PriceHistoryState {
        self.shared.history.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<PriceHistoryState> {
        self.shared.history.subscribe()
    }

    /// Apply new parameters.
    ///
    /// Identical parameters are a no-op. Otherwise the current subscription
    /// (if any) is torn down, and a new one is opened when `running` is set
    /// and a token is present.
    pub async fn update(&self, params: PriceStreamParams) {
        let mut active = self.shared.active.lock().await;

        match active.as_ref() {
            Some(current) if current.params == params => return,
            None if !params.should_connect() => return,
            _ => {}
        }

        if let Some(current) = active.take() {
            self.shared.teardown(current).await;
        }

        if params.should_connect() {
            *active = Some(self.shared.open(params));
        } else {
            tracing::debug!("Price stream idle (not running or no token)");
        }
    }

    /// Close the subscription. Safe to call any number of times.
    pub async fn stop(&self) {
        let mut active = self.shared.active.lock().await;
        if let Some(current) = active.take() {
            self.shared.teardown(current).await;
        }
    }

    /// Whether a subscription is open and its connection has not ended.
    pub async fn is_active(&self) -> bool {
        self.shared
            .active
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| !s.task.is_finished())
    }

    /// Parameters of the current subscription, if one was opened.
    pub async fn params(&self) -> Option<PriceStreamParams> {
        self.shared
            .active
            .lock()
            .await
            .as_ref()
            .map(|s| s.params.clone())
    }
}

impl Shared {
    fn open(&self, params: PriceStreamParams) -> Subscription {
        let token = params.token.as_deref().unwrap_or_default();
        tracing::info!(filter = ?params.filter, "Opening price stream");

        let stream = self.connector.open(token, params.filter.as_deref());
        let live = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(run_subscription(
            stream,
            self.history.clone(),
            Arc::clone(&live),
            self.config.debounce,
            self.config.price_event.clone(),
        ));

        Subscription { params, live, task }
    }

    async fn teardown(&self, subscription: Subscription) {
        subscription.live.store(false, Ordering::SeqCst);
        subscription.task.abort();
        // Cancelled or already finished; the connection is gone either way.
        let _ = subscription.task.await;

        self.history.update_if(|state| {
            if state.is_empty() && state.revision() == 0 {
                return false;
            }
            state.clear();
            true
        });
        tracing::info!("Price stream closed");
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(subscription) = self.active.get_mut().take() {
            subscription.live.store(false, Ordering::SeqCst);
            subscription.task.abort();
        }
    }
}

// ─── Subscription task ───────────────────────────────────────────────────────

async fn run_subscription(
    mut stream: EventStream,
    history: Store<PriceHistoryState>,
    live: Arc<AtomicBool>,
    debounce: Duration,
    event_name: String,
) {
    let mut batch: MicroBatch<(ProductKey, PricePoint)> = MicroBatch::new(debounce);
    let mut stream_open = true;

    let far_future = Instant::now() + Duration::from_secs(86400);
    let flush_timer = tokio::time::sleep_until(far_future);
    tokio::pin!(flush_timer);

    loop {
        if !stream_open && !batch.is_armed() {
            break;
        }

        tokio::select! {
            // ── a) Incoming event ────────────────────────────────────────
            next = stream.next(), if stream_open => {
                match next {
                    Some(Ok(event)) if event.event == event_name => {
                        match parse_price_event(&event.data, now_ms()) {
                            Ok(point) => {
                                let opens_window = !batch.is_armed();
                                batch.push(point, Instant::now());
                                if let (true, Some(deadline)) = (opens_window, batch.deadline()) {
                                    flush_timer.as_mut().reset(deadline);
                                }
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "Dropping malformed price event: {} (raw: {})",
                                    e,
                                    event.data
                                );
                            }
                        }
                    }
                    Some(Ok(event)) => {
                        tracing::trace!(event = %event.event, "Ignoring event");
                    }
                    Some(Err(e)) => {
                        // No automatic reconnect: the owner re-subscribes by changing params.
                        tracing::warn!("Price stream error: {}", e);
                        stream_open = false;
                    }
                    None => {
                        tracing::info!("Price stream ended by server");
                        stream_open = false;
                    }
                }
            }

            // ── b) Debounce deadline ─────────────────────────────────────
            () = &mut flush_timer, if batch.is_armed() => {
                flush(&history, &live, batch.take());
            }
        }
    }
}

fn flush(history: &Store<PriceHistoryState>, live: &AtomicBool, points: Vec<(ProductKey, PricePoint)>) {
    let count = points.len();
    let applied = history.update_if(|state| {
        if !live.load(Ordering::SeqCst) {
            return false;
        }
        state.apply_batch(points);
        true
    });
    if applied {
        tracing::debug!(count, "Flushed price batch");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
