//! Poll synchronizer: periodic full-snapshot fetches with external invalidation.
//!
//! A [`PollSync`] owns one background task per token. The task fetches
//! immediately, then every `SyncConfig::poll_interval`, and additionally
//! whenever its invalidation [`Signal`] is emitted on the [`Signals`] bus.
//! Each successful fetch replaces the snapshot wholesale; a failed fetch is
//! logged and the previous snapshot stays in place.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::SdkError;
use crate::signals::{Signal, Signals};
use crate::store::Store;

/// A REST resource that can be fetched as a whole.
pub trait PollSource: Send + Sync + 'static {
    type Snapshot: Clone + Default + Send + Sync + 'static;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn fetch(&self, token: &str) -> impl Future<Output = Result<Self::Snapshot, SdkError>> + Send;
}

/// Periodically refreshed snapshot of a [`PollSource`].
pub struct PollSync<S: PollSource> {
    inner: Arc<Inner<S>>,
}

impl<S: PollSource> Clone for PollSync<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S: PollSource> {
    poller: Arc<Poller<S>>,
    interval: Duration,
    invalidation: Option<(Signals, Signal)>,
    active: async_lock::Mutex<Option<Polling>>,
}

struct Polling {
    token: String,
    task: JoinHandle<()>,
}

/// State shared with the background task.
struct Poller<S: PollSource> {
    source: S,
    snapshot: Store<S::Snapshot>,
    /// Bumped on every token change; responses from an older epoch are dropped.
    epoch: AtomicU64,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl<S: PollSource> PollSync<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self::build(source, interval, None)
    }

    /// Also refresh whenever `signal` is emitted on `signals`.
    pub fn with_invalidation(source: S, interval: Duration, signals: Signals, signal: Signal) -> Self {
        Self::build(source, interval, Some((signals, signal)))
    }

    fn build(source: S, interval: Duration, invalidation: Option<(Signals, Signal)>) -> Self {
        Self {
            inner: Arc::new(Inner {
                poller: Arc::new(Poller {
                    source,
                    snapshot: Store::default(),
                    epoch: AtomicU64::new(0),
                    issued: AtomicU64::new(0),
                    applied: AtomicU64::new(0),
                }),
                interval,
                invalidation,
                active: async_lock::Mutex::new(None),
            }),
        }
    }

    /// Handle to the current snapshot.
    pub fn snapshot(&self) -> Store<S::Snapshot> {
        self.inner.poller.snapshot.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.inner.poller.snapshot.subscribe()
    }

    pub fn source(&self) -> &S {
        &self.inner.poller.source
    }

    /// Token the poller currently runs with.
    pub async fn token(&self) -> Option<String> {
        self.inner
            .active
            .lock()
            .await
            .as_ref()
            .map(|p| p.token.clone())
    }

    pub async fn is_running(&self) -> bool {
        self.inner
            .active
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.task.is_finished())
    }

    /// Start, restart or stop polling for `token`.
    ///
    /// The same token is a no-op. A different token cancels the running task
    /// and starts a new one, which fetches immediately. `None` (or an empty
    /// token) only stops.
    pub async fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        let mut active = self.inner.active.lock().await;

        if active.as_ref().map(|p| p.token.as_str()) == token.as_deref() {
            return;
        }

        if let Some(polling) = active.take() {
            self.inner.cancel(polling).await;
        }

        if let Some(token) = token {
            *active = Some(self.inner.spawn(token));
        }
    }

    /// Fetch now, outside the regular cycle. No-op without a token.
    pub async fn refresh(&self) {
        let token = self.token().await;
        match token {
            Some(token) => {
                let epoch = self.inner.poller.epoch.load(Ordering::SeqCst);
                self.inner.poller.poll(&token, epoch).await;
            }
            None => tracing::debug!(source = self.inner.poller.source.name(), "Refresh skipped: no token"),
        }
    }

    /// Cancel the timer task and drop the signal listener.
    pub async fn stop(&self) {
        let mut active = self.inner.active.lock().await;
        if let Some(polling) = active.take() {
            self.inner.cancel(polling).await;
        }
    }
}

impl<S: PollSource> Inner<S> {
    fn spawn(&self, token: String) -> Polling {
        let epoch = self.poller.epoch.load(Ordering::SeqCst);
        let signals = self
            .invalidation
            .as_ref()
            .map(|(bus, signal)| (bus.subscribe(), signal.clone()));

        tracing::debug!(source = self.poller.source.name(), "Polling started");
        let task = tokio::spawn(run_poller(
            Arc::clone(&self.poller),
            token.clone(),
            epoch,
            self.interval,
            signals,
        ));

        Polling { token, task }
    }

    async fn cancel(&self, polling: Polling) {
        self.poller.epoch.fetch_add(1, Ordering::SeqCst);
        polling.task.abort();
        let _ = polling.task.await;
        tracing::debug!(source = self.poller.source.name(), "Polling stopped");
    }
}

impl<S: PollSource> Drop for Inner<S> {
    fn drop(&mut self) {
        if let Some(polling) = self.active.get_mut().take() {
            polling.task.abort();
        }
    }
}

impl<S: PollSource> Poller<S> {
    async fn poll(&self, token: &str, epoch: u64) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let name = self.source.name();

        match self.source.fetch(token).await {
            Ok(snapshot) => {
                if self.epoch.load(Ordering::SeqCst) != epoch {
                    tracing::debug!(source = name, seq, "Dropping response for a previous token");
                    return;
                }
                // Overlapping polls are applied in completion order.
                let newest = self.applied.fetch_max(seq, Ordering::SeqCst);
                if newest > seq {
                    tracing::warn!(
                        source = name,
                        seq,
                        newest,
                        "Stale poll response overwrote a newer snapshot"
                    );
                }
                self.snapshot.set(snapshot);
                tracing::debug!(source = name, seq, "Snapshot replaced");
            }
            Err(e) => {
                tracing::warn!(source = name, "Poll failed, keeping previous snapshot: {}", e);
            }
        }
    }
}

async fn run_poller<S: PollSource>(
    poller: Arc<Poller<S>>,
    token: String,
    epoch: u64,
    period: Duration,
    mut signals: Option<(broadcast::Receiver<Signal>, Signal)>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            invalidated = next_invalidation(&mut signals) => {
                if !invalidated {
                    signals = None;
                    continue;
                }
                tracing::debug!(source = poller.source.name(), "Invalidated, refreshing");
            }
        }
        poller.poll(&token, epoch).await;
    }
}

/// Resolves `true` when the watched signal arrives (or the receiver lagged),
/// `false` when the bus is gone. Pending forever without a listener.
async fn next_invalidation(signals: &mut Option<(broadcast::Receiver<Signal>, Signal)>) -> bool {
    let Some((rx, wanted)) = signals.as_mut() else {
        return std::future::pending().await;
    };
    loop {
        match rx.recv().await {
            Ok(signal) if signal == *wanted => return true,
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Signal receiver lagged");
                return true;
            }
            Err(RecvError::Closed) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Counts fetches; fails while `failing` is set.
    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
        failing: std::sync::atomic::AtomicBool,
        tokens: Mutex<Vec<String>>,
    }

    impl PollSource for Arc<Counter> {
        type Snapshot = usize;

        fn name(&self) -> &'static str {
            "counter"
        }

        fn fetch(&self, token: &str) -> impl Future<Output = Result<usize, SdkError>> + Send {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let failing = self.failing.load(Ordering::SeqCst);
            self.tokens.lock().unwrap().push(token.to_string());
            async move {
                if failing {
                    Err(SdkError::Other("boom".into()))
                } else {
                    Ok(n)
                }
            }
        }
    }

    fn setup() -> (Arc<Counter>, PollSync<Arc<Counter>>) {
        let counter = Arc::new(Counter::default());
        let sync = PollSync::new(counter.clone(), Duration::from_secs(30));
        (counter, sync)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_on_start_then_every_interval() {
        let (counter, sync) = setup();
        sync.set_token(Some("tok".into())).await;
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sync.snapshot().get(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 4);
        assert_eq!(sync.snapshot().get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_token_no_fetch() {
        let (counter, sync) = setup();
        sync.set_token(None).await;
        sync.set_token(Some(String::new())).await;
        sync.refresh().await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
        assert!(!sync.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_snapshot() {
        let (counter, sync) = setup();
        sync.set_token(Some("tok".into())).await;
        settle().await;
        assert_eq!(sync.snapshot().get(), 1);

        counter.failing.store(true, Ordering::SeqCst);
        sync.refresh().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
        assert_eq!(sync.snapshot().get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let (counter, sync) = setup();
        sync.set_token(Some("tok".into())).await;
        settle().await;
        sync.stop().await;
        sync.stop().await;
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
        assert!(sync.token().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_change_restarts() {
        let (counter, sync) = setup();
        sync.set_token(Some("a".into())).await;
        sync.set_token(Some("a".into())).await;
        settle().await;
        sync.set_token(Some("b".into())).await;
        settle().await;
        assert_eq!(*counter.tokens.lock().unwrap(), ["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_triggers_refresh() {
        let counter = Arc::new(Counter::default());
        let signals = Signals::new();
        let sync = PollSync::with_invalidation(
            counter.clone(),
            Duration::from_secs(30),
            signals.clone(),
            Signal::CatalogUpdated,
        );
        sync.set_token(Some("tok".into())).await;
        settle().await;

        signals.emit(Signal::Custom("unrelated".into()));
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

        signals.emit(Signal::CatalogUpdated);
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);

        sync.stop().await;
        assert_eq!(signals.listener_count(), 0);
        signals.emit(Signal::CatalogUpdated);
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    }
}
