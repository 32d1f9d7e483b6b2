// ABOUTME: Fetch module - turns queued jobs into values.
// ABOUTME: Provides the Fetcher trait, a closure adapter, and an HTTP implementation.

mod http;
mod traits;

pub use http::*;
pub use traits::*;
