// ABOUTME: Root module for fetchmux - single-flight request coordination library.
// ABOUTME: Re-exports all public types from submodules.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod prelude;
pub mod queue;

pub use error::FetchmuxError;
