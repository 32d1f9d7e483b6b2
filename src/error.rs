// ABOUTME: Defines all error types for the fetchmux library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under FetchmuxError.

/// Top-level error type for the fetchmux library.
#[derive(Debug, thiserror::Error)]
pub enum FetchmuxError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Errors from fetch implementations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors from queue lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
