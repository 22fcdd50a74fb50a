// Retry utilities

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{error::Elapsed, sleep, timeout};
use tracing::{debug, warn};

/// Fixed-interval retry with a hard deadline on every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra tries after the first one.
    pub retries: u32,
    pub interval: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn total_attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Every attempt failed; carries the last failure.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or `policy.total_attempts()` tries fail.
///
/// An attempt that outlives `attempt_timeout` is dropped, which cancels whatever
/// I/O it had in flight, and counts as failed. The wait between failures is
/// always `interval`; there is no wait after the last one.
pub async fn with_retry<F, Fut, T, E>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<Elapsed> + Display,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        debug!(attempt, total = policy.total_attempts(), "Starting attempt");

        let error = match timeout(policy.attempt_timeout, operation(attempt)).await {
            Ok(Ok(result)) => return Ok(result),
            Ok(Err(error)) => error,
            Err(elapsed) => E::from(elapsed),
        };

        if attempt >= policy.total_attempts() {
            warn!(attempt, error = %error, "Final attempt failed");
            return Err(RetryExhausted {
                attempts: attempt,
                last_error: error,
            });
        }

        warn!(attempt, error = %error, retry_in = ?policy.interval, "Attempt failed, retrying");
        sleep(policy.interval).await;
    }
}
