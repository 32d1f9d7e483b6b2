// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use fetchmux::prelude::*;` to get started quickly.

pub use crate::config::{QueryConfig, RequestConfig};
pub use crate::coordinator::{DEFAULT_THROTTLE_WINDOW, Delivery, RequestCoordinator};
pub use crate::error::{FetchError, FetchmuxError, QueueError};
pub use crate::fetch::{Fetcher, FnFetcher, HttpFetcher};
pub use crate::queue::{EnqueuedJob, ManualQueue, TaskQueue, WorkerQueue};
