// ABOUTME: Coordinator module for collapsing request triggers into dispatches.
// ABOUTME: Contains the request coordinator and its delivery targets.

mod coordinator;
mod delivery;

pub use coordinator::{DEFAULT_THROTTLE_WINDOW, RequestCoordinator};
pub use delivery::Delivery;
