//! Bounded retry for connectivity failures.

use std::thread;

use tracing::{error, warn};

use crate::config::RetryPolicy;
use crate::error::PipelineResult;

/// Run `op`, retrying retryable errors according to `policy`.
///
/// Only [`PipelineError::Connectivity`](crate::PipelineError::Connectivity)
/// is retried. Other errors, and the last connectivity error once attempts
/// are exhausted, are returned unchanged.
pub fn with_retry<T, F>(policy: &RetryPolicy, operation: &str, mut op: F) -> PipelineResult<T>
where
    F: FnMut() -> PipelineResult<T>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after connectivity failure"
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    error!(operation, attempts = attempt, error = %e, "giving up");
                }
                return Err(e);
            }
        }
    }
}
