//! Concurrent task execution
//!
//! This module provides:
//! - A bounded fan-out/fan-in executor keyed by task identity
//! - A bounded-attempt retry wrapper with exponential backoff

mod batch;
mod retry;

pub use batch::{Batch, BatchError, BatchFailure, BatchResult, TaskError, DEFAULT_CONCURRENCY};
pub use retry::{
    retry, RetryPolicy, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY,
    DEFAULT_MULTIPLIER,
};
