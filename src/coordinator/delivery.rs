// ABOUTME: Delivery handles passed to the task queue alongside each job.
// ABOUTME: Either repopulates a coordinator's cache or settles a one-shot promise.

use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};

/// How the queue hands a fetched value back to whoever asked for it.
///
/// A delivery is fire-and-forget from the queue's side: it never fails and
/// tolerates being invoked zero, one, or many times. A queue that retries may
/// deliver repeatedly; only the cache variant observes anything past the
/// first call.
pub enum Delivery<T> {
    /// Writes into the owning coordinator's cache and notifies watchers.
    Cache(Arc<watch::Sender<Option<T>>>),
    /// Settles one pending promise; later deliveries are ignored.
    Resolve(Mutex<Option<oneshot::Sender<T>>>),
}

impl<T> Delivery<T> {
    /// Wrap a one-shot sender for promise-mode dispatch.
    pub(crate) fn resolver(tx: oneshot::Sender<T>) -> Self {
        Self::Resolve(Mutex::new(Some(tx)))
    }

    /// Hand a fetched value over.
    ///
    /// Never fails: a promise whose receiver is gone, or one already
    /// settled, swallows the value.
    pub fn deliver(&self, value: T) {
        match self {
            Delivery::Cache(cache) => {
                cache.send_replace(Some(value));
            }
            Delivery::Resolve(slot) => {
                if let Some(tx) = slot.lock().unwrap().take() {
                    let _ = tx.send(value);
                }
            }
        }
    }

    /// True when this delivery writes into a coordinator cache.
    pub fn is_cache(&self) -> bool {
        matches!(self, Delivery::Cache(_))
    }
}
