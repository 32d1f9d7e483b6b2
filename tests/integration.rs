// ABOUTME: Integration tests verifying modules work together.
// ABOUTME: Tests the full trigger-to-delivery workflow without external services.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::time::{sleep, timeout};

use fetchmux::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A fetcher that counts how many times it actually runs.
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Fetcher<Value> for CountingFetcher {
    async fn fetch(
        &self,
        _query: &QueryConfig,
        request: Option<&Value>,
    ) -> Result<Value, anyhow::Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let url = request
            .and_then(|r| r["url"].as_str())
            .unwrap_or("<none>")
            .to_string();
        Ok(json!({"url": url, "fetch": n}))
    }
}

#[tokio::test]
async fn test_trigger_to_cache_end_to_end() {
    init_tracing();
    let queue: Arc<dyn TaskQueue<Value>> =
        Arc::new(WorkerQueue::from_fn(|_query, request: Option<Value>| async move {
            let url = request
                .as_ref()
                .and_then(|r| r["url"].as_str())
                .unwrap_or_default()
                .to_string();
            Ok(json!({"fetched": url}))
        }));

    let config = RequestConfig::new(QueryConfig::new()).request(json!({"url": "/items"}));
    let mut coordinator = RequestCoordinator::new(queue, config);

    // Subscribe before triggering so the store cannot slip past us.
    let mut watcher = coordinator.subscribe();
    coordinator.trigger();

    timeout(Duration::from_secs(1), watcher.changed())
        .await
        .expect("fetch should land within a second")
        .expect("cache channel should stay open");
    assert_eq!(coordinator.read(), Some(json!({"fetched": "/items"})));
}

#[tokio::test]
async fn test_bare_config_fires_on_construction() {
    init_tracing();
    let queue: Arc<dyn TaskQueue<Value>> =
        Arc::new(WorkerQueue::from_fn(|query: QueryConfig, _request| async move {
            Ok(json!({"page": query.params["page"]}))
        }));

    let config = RequestConfig::new(QueryConfig::new().param("page", 7));
    let coordinator = RequestCoordinator::new(queue, config);

    // The dispatch already happened inside new(); wait only if the value
    // has not landed yet.
    let mut watcher = coordinator.subscribe();
    if coordinator.read().is_none() {
        timeout(Duration::from_secs(1), watcher.changed())
            .await
            .expect("construction fire should land within a second")
            .expect("cache channel should stay open");
    }
    assert_eq!(coordinator.read(), Some(json!({"page": 7})));
}

#[tokio::test]
async fn test_promise_workflow() {
    init_tracing();
    let queue: Arc<dyn TaskQueue<Value>> =
        Arc::new(WorkerQueue::from_fn(|_query, request: Option<Value>| async move {
            Ok(json!({"echo": request}))
        }));

    let config = RequestConfig::new(QueryConfig::new())
        .request(json!({"url": "/profile"}))
        .return_promise(true);
    let mut coordinator = RequestCoordinator::new(queue, config);
    assert!(coordinator.config().return_promise);

    let value = timeout(Duration::from_secs(1), coordinator.trigger_as_promise())
        .await
        .expect("promise should settle within a second");
    assert_eq!(value, Some(json!({"echo": {"url": "/profile"}})));
}

#[tokio::test]
async fn test_run_once_fetches_exactly_once() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let queue: Arc<dyn TaskQueue<Value>> =
        WorkerQueue::shared(CountingFetcher { calls: calls.clone() });

    let config =
        RequestConfig::new(QueryConfig::new().run_once(true)).request(json!({"url": "/once"}));
    let mut coordinator =
        RequestCoordinator::new(queue, config).with_throttle_window(Duration::from_millis(50));

    let mut watcher = coordinator.subscribe();
    coordinator.trigger();
    timeout(Duration::from_secs(1), watcher.changed())
        .await
        .expect("first fetch should land within a second")
        .expect("cache channel should stay open");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Give the throttle window time to expire, then trigger again. The
    // sleeps leave room for any wrongly dispatched job to actually run.
    sleep(Duration::from_millis(100)).await;
    coordinator.trigger();
    coordinator.trigger();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        calls.load(Ordering::SeqCst),
        1,
        "run-once must survive the throttle window expiring"
    );
}

#[tokio::test]
async fn test_updates_stream_tracks_refreshes() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let queue: Arc<dyn TaskQueue<Value>> =
        WorkerQueue::shared(CountingFetcher { calls: calls.clone() });

    let config = RequestConfig::new(QueryConfig::new()).request(json!({"url": "/feed"}));
    let mut coordinator =
        RequestCoordinator::new(queue, config).with_throttle_window(Duration::from_millis(50));

    let mut updates = Box::pin(coordinator.updates());
    coordinator.trigger();
    let first = timeout(Duration::from_secs(1), updates.next())
        .await
        .expect("first refresh should arrive");
    assert_eq!(first, Some(Some(json!({"url": "/feed", "fetch": 1}))));

    sleep(Duration::from_millis(100)).await;
    coordinator.trigger();
    let second = timeout(Duration::from_secs(1), updates.next())
        .await
        .expect("second refresh should arrive");
    assert_eq!(second, Some(Some(json!({"url": "/feed", "fetch": 2}))));
}

#[tokio::test]
async fn test_manual_queue_stands_in_for_the_worker() {
    let queue: Arc<ManualQueue<Value>> = ManualQueue::shared();
    let delegate: Arc<dyn TaskQueue<Value>> = queue.clone();
    let mut coordinator = RequestCoordinator::new(
        delegate,
        RequestConfig::new(QueryConfig::new()).request(json!({"url": "/draft"})),
    );

    coordinator.trigger();
    assert_eq!(queue.len(), 1);
    assert!(queue.deliver_next(json!({"stubbed": true})));
    assert_eq!(coordinator.read(), Some(json!({"stubbed": true})));
}
