//! Retry wrapper for database operations.
//!
//! DESIGN
//! ======
//! Every service call runs inside `with_retry`. Only transient failures
//! (dropped connections, pool exhaustion, serialization conflicts) are
//! retried, with a fixed delay between attempts. Anything else, including
//! constraint violations and domain errors, returns on the first attempt.

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

const DEFAULT_TRIES: u32 = 3;
const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// How many times an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    tries: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy; `tries` is clamped to at least one attempt.
    #[must_use]
    pub const fn new(tries: u32, delay: Duration) -> Self {
        let tries = if tries == 0 { 1 } else { tries };
        Self { tries, delay }
    }

    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRIES, DEFAULT_DELAY)
    }
}

/// Errors that can tell whether repeating the operation may succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for sqlx::Error {
    fn is_transient(&self) -> bool {
        match self {
            Self::Io(_) | Self::PoolTimedOut => true,
            Self::Database(db) => db.code().is_some_and(|code| is_transient_sqlstate(&code)),
            _ => false,
        }
    }
}

/// Connection exceptions (class `08`), serialization failures and deadlocks.
pub(crate) fn is_transient_sqlstate(code: &str) -> bool {
    code.starts_with("08") || code == "40001" || code == "40P01"
}

/// Run `op`, retrying transient failures according to `policy`.
///
/// # Errors
///
/// Returns the first non-transient error, or the last transient error once
/// all attempts are used up.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, operation: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.tries => {
                warn!(
                    error = %e,
                    operation,
                    attempt,
                    total = policy.tries,
                    "database operation failed; retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
