// ABOUTME: Tokio-backed task queue that drains jobs into a fetcher.
// ABOUTME: Spawns one task per job so a slow fetch never blocks the intake.

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::coordinator::Delivery;
use crate::error::QueueError;
use crate::fetch::{Fetcher, FnFetcher};

use super::{EnqueuedJob, TaskQueue};

/// Queue that runs each job through a [`Fetcher`].
///
/// Jobs are accepted from synchronous contexts and handed to a drain task
/// over an unbounded channel; each fetch then runs in its own spawned task,
/// so delivery order between overlapping jobs is unspecified. Fetch failures
/// are logged and dropped - the coordinator side already tolerates a
/// delivery that never fires.
pub struct WorkerQueue<T> {
    tx: Mutex<Option<mpsc::UnboundedSender<EnqueuedJob<T>>>>,
    drain: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> WorkerQueue<T> {
    /// Spawn a queue draining into `fetcher`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(fetcher: impl Fetcher<T> + 'static) -> Self {
        let fetcher: Arc<dyn Fetcher<T>> = Arc::new(fetcher);
        let (tx, mut rx) = mpsc::unbounded_channel::<EnqueuedJob<T>>();

        let drain = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let fetcher = fetcher.clone();
                tokio::spawn(async move {
                    run_job(fetcher, job).await;
                });
            }
            debug!("queue intake closed, drain task exiting");
        });

        Self {
            tx: Mutex::new(Some(tx)),
            drain: Mutex::new(Some(drain)),
        }
    }

    /// Spawn a queue wrapped in Arc for sharing with coordinators.
    pub fn shared(fetcher: impl Fetcher<T> + 'static) -> Arc<Self> {
        Arc::new(Self::spawn(fetcher))
    }

    /// Spawn a queue from a plain async closure.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(QueryConfig, Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, anyhow::Error>> + Send + 'static,
    {
        Self::spawn(FnFetcher::new(f))
    }

    /// Stop accepting jobs and wait for the drain task to finish.
    ///
    /// Fetches already spawned keep running to completion; only the intake
    /// stops. Jobs enqueued after shutdown are dropped with a warning.
    pub async fn shutdown(&self) -> Result<(), QueueError> {
        self.tx.lock().unwrap().take();
        let drain = self.drain.lock().unwrap().take();
        if let Some(handle) = drain {
            handle.await?;
        }
        Ok(())
    }
}

async fn run_job<T>(fetcher: Arc<dyn Fetcher<T>>, job: EnqueuedJob<T>) {
    debug!(job_id = %job.id, "running fetch job");
    match fetcher.fetch(&job.query, job.request.as_ref()).await {
        Ok(value) => {
            if let Some(delivery) = job.delivery {
                delivery.deliver(value);
            }
        }
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "fetch job failed, dropping delivery");
        }
    }
}

impl<T: Send + Sync + 'static> TaskQueue<T> for WorkerQueue<T> {
    fn enqueue(&self, query: QueryConfig, request: Option<Value>, delivery: Option<Delivery<T>>) {
        let job = EnqueuedJob::new(query, request, delivery);
        debug!(job_id = %job.id, "job queued");

        let dropped = match self.tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(job).is_err(),
            None => true,
        };
        if dropped {
            warn!("job dropped, queue is shut down");
        }
    }
}
