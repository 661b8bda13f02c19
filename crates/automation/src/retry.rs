//! Bounded retry with a fixed delay.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{ClassifyRetry, RetryPolicy};

/// Runs `operation` up to `max_retries + 1` times.
///
/// The operation receives `true` on the final allowed attempt so it can change
/// its own failure behaviour (e.g. only notify users when no retry is left).
/// The first success is returned as is. A failure with attempts left sleeps
/// `delay` (or the error's own `Retryable { after }` hint, if longer) and
/// tries again; a failure on the final attempt, or any
/// [`RetryPolicy::NonRetryable`] failure, is returned unchanged.
///
/// The wait is a `tokio` timer and suspends only the calling task.
pub async fn retry<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    delay: Duration,
) -> Result<T, E>
where
    E: ClassifyRetry + std::fmt::Display,
    F: FnMut(bool) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        let is_final_attempt = attempt == max_retries;
        let error = match operation(is_final_attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let wait = match error.retry_policy() {
            RetryPolicy::NonRetryable => {
                debug!(attempt, "Failure is not retryable");
                return Err(error);
            }
            _ if is_final_attempt => return Err(error),
            RetryPolicy::Retryable { after } => after.map_or(delay, |after| after.max(delay)),
        };

        attempt += 1;
        warn!(
            attempt,
            max_retries,
            wait_ms = wait.as_millis() as u64,
            error = %error,
            "Attempt failed, retrying"
        );
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
