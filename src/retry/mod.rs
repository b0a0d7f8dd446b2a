//! Retry with configurable backoff for async operations.
//!
//! The engine in this module runs a fallible async operation up to
//! `max_retries + 1` times, waiting between attempts and consulting a
//! retry-eligibility classifier before each retry:
//!
//! - **[`RetryPolicy`]** is the configuration: retry budget, backoff, and
//!   classifier, built with a `with_*` chain.
//! - **[`Backoff`]** is the inter-attempt delay: a fixed duration or a
//!   function of the 1-based retry index ([`exponential_backoff`] is the
//!   provided doubling helper).
//! - **[`RetryError`]** is the terminal failure, always carrying the last
//!   error the operation produced.
//!
//! # Quick Start
//!
//! ```rust
//! use redrive::{retry, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let policy = RetryPolicy::new()
//!     .with_max_retries(2)
//!     .with_delay(Duration::from_millis(10));
//!
//! let value = retry(|| async { Ok::<_, String>(42) }, &policy).await.unwrap();
//! assert_eq!(value, 42);
//! # });
//! ```
//!
//! # Which errors are retried
//!
//! By default only errors whose rendered message carries a recognized
//! network-failure marker are retried (see [`is_transient_message`]);
//! everything else fails fast on the first occurrence. Supply
//! [`RetryPolicy::with_classifier`] to broaden or replace that policy.
//!
//! # Side effects
//!
//! Attempt failures, backoff waits, and give-ups are emitted as `tracing`
//! events. They are diagnostics, not part of the functional contract.

mod classify;
mod error;
mod policy;

pub use classify::is_transient_message;
pub use error::RetryError;
pub use policy::{exponential_backoff, Backoff, RetryPolicy};

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Run `operation` until it succeeds, the retry budget runs out, or a
/// non-retryable error occurs.
///
/// The operation is a factory for attempts: it is called once per attempt
/// and must be safe to call up to `policy.max_retries() + 1` times; if it
/// has side effects, repeating them is the caller's responsibility. The
/// computed backoff is consulted with the 1-based index of the upcoming
/// retry.
///
/// # Errors
///
/// Returns [`RetryError`] wrapping the last error produced, either when all
/// attempts failed with retryable errors or as soon as a non-retryable
/// error occurs.
///
/// # Examples
///
/// ```rust
/// use redrive::{retry, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let calls = AtomicU32::new(0);
/// let policy = RetryPolicy::new()
///     .with_max_retries(2)
///     .with_delay(Duration::from_millis(10));
///
/// let value = retry(
///     || {
///         let n = calls.fetch_add(1, Ordering::SeqCst);
///         async move {
///             if n < 2 {
///                 Err("NetworkError".to_string())
///             } else {
///                 Ok("ok")
///             }
///         }
///     },
///     &policy,
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(value, "ok");
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn retry<T, E, F, Fut>(mut operation: F, policy: &RetryPolicy<E>) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = None;

    for attempt in 0..=policy.max_retries() {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                tracing::warn!(attempt = attempt + 1, error = %error, "attempt failed");

                let retryable = policy.is_retryable(&error);
                if retryable && attempt < policy.max_retries() {
                    let wait = policy.delay_for_attempt(attempt + 1);
                    tracing::debug!(wait_ms = wait.as_millis() as u64, "retrying after backoff");
                    last_error = Some(error);
                    delay(wait).await;
                    continue;
                }

                tracing::warn!(attempts = attempt + 1, "giving up");
                return Err(if retryable {
                    RetryError::Exhausted {
                        error,
                        attempts: attempt + 1,
                    }
                } else {
                    RetryError::NonRetryable {
                        error,
                        attempts: attempt + 1,
                    }
                });
            }
        }
    }

    // The loop returns on the final attempt; reaching this point means
    // neither a result nor an error was recorded.
    Err(last_error
        .map(|error| RetryError::Exhausted {
            error,
            attempts: policy.max_retries() + 1,
        })
        .unwrap_or(RetryError::Unexpected))
}

/// Wait for `duration`, then resolve.
///
/// A scoped timer wait with no cancellation handle; under a paused tokio
/// clock it participates in virtual time like any other sleep.
pub async fn delay(duration: Duration) {
    tokio::time::sleep(duration).await;
}
