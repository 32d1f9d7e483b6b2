// ABOUTME: Request configuration types - the logical identity of a fetch.
// ABOUTME: Structural equality on these values decides when two requests are the same.

use serde::{Deserialize, Serialize};

/// Structured dispatch options for a request.
///
/// The named flags drive the coordinator's gates; everything else the caller
/// puts in the config travels in `params` and is forwarded to the queue
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryConfig {
    /// Allow at most one dispatch for the lifetime of the coordinator.
    pub run_once: bool,

    /// When explicitly false, suppresses automatic triggering only.
    /// Manual triggers ignore this flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<bool>,

    /// Dispatch without a delivery handle and clear the cached value.
    pub reset: bool,

    /// Keep automatic triggering on even when transport parameters are present.
    pub run_auto: bool,

    /// Opaque query parameters forwarded to the queue untouched.
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl QueryConfig {
    /// Create an empty config: no flags set, no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow at most one dispatch ever.
    pub fn run_once(mut self, run_once: bool) -> Self {
        self.run_once = run_once;
        self
    }

    /// Explicitly enable or disable automatic triggering.
    pub fn run(mut self, run: bool) -> Self {
        self.run = Some(run);
        self
    }

    /// Request a cache reset on the next dispatch.
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Keep automatic triggering on alongside transport parameters.
    pub fn run_auto(mut self, run_auto: bool) -> Self {
        self.run_auto = run_auto;
        self
    }

    /// Add an opaque query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// The logical identity of a request: what to fetch and how to consume it.
///
/// Two configs describe the same request exactly when they are structurally
/// equal; the derived `PartialEq` compares deeply through the opaque values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestConfig {
    /// Structured dispatch options.
    #[serde(rename = "queryConfig")]
    pub query: QueryConfig,

    /// Opaque transport parameters forwarded to the queue, absent for
    /// identities that carry everything in the query config.
    #[serde(rename = "requestConfig", skip_serializing_if = "Option::is_none")]
    pub request: Option<serde_json::Value>,

    /// Consumption mode selector: promise-style results when true, cached
    /// reads otherwise.
    pub return_promise: bool,
}

impl RequestConfig {
    /// Create a config from dispatch options alone.
    pub fn new(query: QueryConfig) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    /// Attach opaque transport parameters.
    pub fn request(mut self, request: serde_json::Value) -> Self {
        self.request = Some(request);
        self
    }

    /// Select the consumption mode.
    pub fn return_promise(mut self, return_promise: bool) -> Self {
        self.return_promise = return_promise;
        self
    }
}
