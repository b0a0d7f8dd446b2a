//! # Redrive
//!
//! Retry-with-backoff for async operations, and last-write-wins state
//! tracking for actions a caller re-invokes over time.
//!
//! Two pieces, leaf first:
//!
//! - [`retry`](crate::retry::retry) runs a fallible async operation up to
//!   `max_retries + 1` times, consulting a replaceable classifier to decide
//!   which errors deserve another attempt and a [`Backoff`] to decide how
//!   long to wait between them.
//! - [`TrackedAction`] wraps a parameterized async action with an
//!   observable loading/error/data cell. Every invocation is stamped; an
//!   outcome is published only if no newer invocation has started, so a
//!   slow stale response can never clobber a fresh one.
//!
//! ## Quick Example
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
//! let value = retry(|| async { Ok::<_, String>("fetched") }, &policy).await.unwrap();
//! assert_eq!(value, "fetched");
//! # });
//! ```
//!
//! Retrying is only half of the story when a UI keeps re-submitting the
//! same action; see the [`action`] module for the stale-suppression side.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod action;
pub mod retry;

// Re-exports
pub use action::{ActionError, ActionOptions, ActionState, TrackedAction};
pub use retry::{delay, exponential_backoff, retry, Backoff, RetryError, RetryPolicy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{ActionError, ActionOptions, ActionState, TrackedAction};
    pub use crate::retry::{
        delay, exponential_backoff, retry, Backoff, RetryError, RetryPolicy,
    };
}
