// ABOUTME: Defines the TaskQueue trait - the seam between coordinators and execution.
// ABOUTME: Includes EnqueuedJob, the unit of work queues traffic in.

use serde_json::Value;
use uuid::Uuid;

use crate::config::QueryConfig;
use crate::coordinator::Delivery;

/// External task queue contract.
///
/// `enqueue` is synchronous fire-and-forget: it must not block, and the queue
/// invokes the delivery whenever a result exists - possibly never, possibly
/// more than once if it retries. The queue is the sole source of eventual
/// data; coordinators never fetch anything themselves.
pub trait TaskQueue<T>: Send + Sync {
    /// Hand a job to the queue. `delivery` is absent for reset dispatches.
    fn enqueue(&self, query: QueryConfig, request: Option<Value>, delivery: Option<Delivery<T>>);
}

/// One unit of queued work.
pub struct EnqueuedJob<T> {
    /// Correlation id assigned at enqueue time.
    pub id: Uuid,
    /// Structured options the coordinator dispatched with, opaque query
    /// parameters included.
    pub query: QueryConfig,
    /// Opaque transport parameters, if any.
    pub request: Option<Value>,
    /// Completion handle; absent for reset dispatches.
    pub delivery: Option<Delivery<T>>,
}

impl<T> EnqueuedJob<T> {
    /// Build a job with a fresh correlation id.
    pub fn new(query: QueryConfig, request: Option<Value>, delivery: Option<Delivery<T>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            request,
            delivery,
        }
    }
}
