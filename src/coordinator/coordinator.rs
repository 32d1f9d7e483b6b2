// ABOUTME: RequestCoordinator - the single-flight decision core.
// ABOUTME: Decides per trigger whether to dispatch to the queue, hold, or reset.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use tokio::sync::{oneshot, watch};
use tracing::debug;

use super::delivery::Delivery;
use crate::config::RequestConfig;
use crate::queue::TaskQueue;

/// Minimum interval between successive dispatches for one identity.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(5000);

/// Single-flight coordinator for one logical request identity.
///
/// Owns the cached value, the last-dispatch timestamp, and the run-once flag
/// for exactly one subscriber. Triggering is cheap: the run-once and throttle
/// gates absorb re-invocation storms, so owners may consult the coordinator
/// arbitrarily often (every render, every poll tick) without flooding the
/// queue. Dropped with its owner; nothing is shared across identities.
pub struct RequestCoordinator<T> {
    queue: Arc<dyn TaskQueue<T>>,
    current: RequestConfig,
    cache: Arc<watch::Sender<Option<T>>>,
    last_dispatch: Instant,
    ran_once: bool,
    throttle: Duration,
}

impl<T: Clone + Send + Sync + 'static> RequestCoordinator<T> {
    /// Create a coordinator for `config`, dispatching through `queue`.
    ///
    /// Construction counts as the first consult: when the config calls for
    /// automatic triggering, the first dispatch happens here.
    pub fn new(queue: Arc<dyn TaskQueue<T>>, config: RequestConfig) -> Self {
        let (cache, _) = watch::channel(None);
        let mut coordinator = Self {
            queue,
            current: config,
            cache: Arc::new(cache),
            last_dispatch: Instant::now(),
            ran_once: false,
            throttle: DEFAULT_THROTTLE_WINDOW,
        };
        coordinator.auto_trigger();
        coordinator
    }

    /// Override the throttle window.
    ///
    /// The first dispatch is never throttled (the cache starts empty), so
    /// setting this after construction does not change what `new` did.
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle = window;
        self
    }

    /// Observe a possibly-updated config. This is the per-consult entry
    /// point: identity refresh first, then the auto-trigger policy.
    ///
    /// A structurally different config replaces the current one before any
    /// policy runs. The cached value, dispatch timestamp, and run-once flag
    /// all survive the change.
    pub fn observe(&mut self, config: RequestConfig) {
        if self.current != config {
            debug!("request identity changed, replacing config");
            self.current = config;
        }
        self.auto_trigger();
    }

    /// Attempt a dispatch using the persistent cache delivery.
    ///
    /// Suppressed calls cost nothing; a successful dispatch lands in the
    /// queue and the eventual value shows up via [`read`](Self::read) and
    /// the watchers.
    pub fn trigger(&mut self) {
        self.trigger_with(None);
    }

    /// Attempt a dispatch whose result settles the returned future.
    ///
    /// The dispatch attempt happens inside this call, not when the future is
    /// first polled. Every call gets an independent future; futures are never
    /// cached or deduplicated, only the underlying dispatch is throttled.
    /// Resolves `Some(value)` on delivery and `None` when the resolver was
    /// dropped undelivered (dispatch suppressed, reset requested, or the
    /// queue discarded the job); stays pending for as long as the queue holds
    /// the resolver. No timeout is imposed.
    pub fn trigger_as_promise(&mut self) -> impl Future<Output = Option<T>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.trigger_with(Some(tx));
        async move { rx.await.ok() }
    }

    /// The latest cached value, if any. No side effects.
    pub fn read(&self) -> Option<T> {
        self.cache.borrow().clone()
    }

    /// Watch the cache. The receiver sees every store and every clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.cache.subscribe()
    }

    /// Cache changes as an async stream, one item per store or clear.
    pub fn updates(&self) -> impl Stream<Item = Option<T>> + Send + 'static {
        let mut rx = self.cache.subscribe();
        async_stream::stream! {
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                yield value;
            }
        }
    }

    /// The most recently observed config.
    pub fn config(&self) -> &RequestConfig {
        &self.current
    }

    /// Automatic triggering: fires on every consult unless transport
    /// parameters are present without `run_auto`, or `run` is explicitly
    /// false. Manual triggers bypass this policy entirely.
    fn auto_trigger(&mut self) {
        if self.current.query.run == Some(false) {
            return;
        }
        if self.current.request.is_none() || self.current.query.run_auto {
            self.trigger();
        }
    }

    /// The decision core shared by both trigger flavors.
    fn trigger_with(&mut self, resolver: Option<oneshot::Sender<T>>) {
        // Run-once gate. Arming happens even when the throttle below
        // suppresses the dispatch, and suppression is permanent until the
        // observed config stops asking for run-once.
        let run_once = self.current.query.run_once;
        if self.ran_once && run_once {
            debug!("trigger suppressed by run-once gate");
            return;
        }
        self.ran_once = run_once;

        // Throttle gate. An identity with no cached value is never starved.
        let elapsed = self.last_dispatch.elapsed();
        if self.cache.borrow().is_some() && elapsed < self.throttle {
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "trigger suppressed by throttle window"
            );
            return;
        }

        let promise = resolver.is_some();
        let reset = self.current.query.reset;
        let delivery = if reset {
            None
        } else if let Some(tx) = resolver {
            Some(Delivery::resolver(tx))
        } else {
            Some(Delivery::Cache(self.cache.clone()))
        };

        debug!(reset, promise, "dispatching job to queue");
        self.queue.enqueue(
            self.current.query.clone(),
            self.current.request.clone(),
            delivery,
        );
        self.last_dispatch = Instant::now();

        // A reset dispatch empties the slot so readers treat it as absent
        // until the queue repopulates it.
        if reset {
            self.cache.send_if_modified(|value| value.take().is_some());
        }
    }
}
