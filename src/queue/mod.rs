// ABOUTME: Queue module - where dispatched jobs go to be executed.
// ABOUTME: Defines the TaskQueue seam plus manual and worker implementations.

mod manual;
mod traits;
mod worker;

pub use manual::*;
pub use traits::*;
pub use worker::*;
