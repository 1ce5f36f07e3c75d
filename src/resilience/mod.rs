//! Resilience subsystem.
//!
//! Every outbound hop has a deadline. There are no retries: a failed hop
//! fails the request.

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineElapsed};
