// ABOUTME: Manually-driven task queue for tests and embedding harnesses.
// ABOUTME: Records every job and lets the harness deliver values by hand.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::config::QueryConfig;
use crate::coordinator::Delivery;

use super::{EnqueuedJob, TaskQueue};

/// In-memory queue that performs no work.
///
/// Stores jobs in arrival order. Useful for testing coordinators and for
/// harnesses that want full control over when values arrive.
pub struct ManualQueue<T> {
    jobs: Mutex<Vec<EnqueuedJob<T>>>,
}

impl<T> ManualQueue<T> {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Create a new queue wrapped in Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of jobs enqueued so far, delivered or not.
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// True when nothing has been enqueued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `value` to the oldest job still holding a delivery handle.
    ///
    /// The handle is consumed, so successive calls walk forward through the
    /// jobs. Reset jobs carry no handle and are skipped. Returns false when
    /// no undelivered job remains.
    pub fn deliver_next(&self, value: T) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        for job in jobs.iter_mut() {
            if let Some(delivery) = job.delivery.take() {
                delivery.deliver(value);
                return true;
            }
        }
        false
    }

    /// Deliver clones of `value` to every job still holding a handle.
    /// Returns how many deliveries fired.
    pub fn deliver_all(&self, value: T) -> usize
    where
        T: Clone,
    {
        let mut jobs = self.jobs.lock().unwrap();
        let mut delivered = 0;
        for job in jobs.iter_mut() {
            if let Some(delivery) = job.delivery.take() {
                delivery.deliver(value.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Take every captured job, leaving the queue empty.
    pub fn drain(&self) -> Vec<EnqueuedJob<T>> {
        self.jobs.lock().unwrap().drain(..).collect()
    }
}

impl<T> Default for ManualQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> TaskQueue<T> for ManualQueue<T> {
    fn enqueue(&self, query: QueryConfig, request: Option<Value>, delivery: Option<Delivery<T>>) {
        self.jobs
            .lock()
            .unwrap()
            .push(EnqueuedJob::new(query, request, delivery));
    }
}
