// ABOUTME: Defines the Fetcher trait - how a queued job turns into data.
// ABOUTME: Includes FnFetcher for building fetchers from plain closures.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::QueryConfig;

/// Produces the data for one queued job.
///
/// Implementations receive the job's structured options and opaque transport
/// parameters and return the fetched value. Errors are embedder-defined;
/// queues log and drop them.
#[async_trait]
pub trait Fetcher<T>: Send + Sync {
    /// Fetch the value described by `query` and `request`.
    async fn fetch(&self, query: &QueryConfig, request: Option<&Value>)
    -> Result<T, anyhow::Error>;
}

/// Adapter turning a plain async closure into a [`Fetcher`].
pub struct FnFetcher<F> {
    f: F,
}

impl<F> FnFetcher<F> {
    /// Wrap a closure of shape `Fn(QueryConfig, Option<Value>) -> impl Future`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, F, Fut> Fetcher<T> for FnFetcher<F>
where
    F: Fn(QueryConfig, Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, anyhow::Error>> + Send + 'static,
{
    async fn fetch(
        &self,
        query: &QueryConfig,
        request: Option<&Value>,
    ) -> Result<T, anyhow::Error> {
        (self.f)(query.clone(), request.cloned()).await
    }
}
