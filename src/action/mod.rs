//! Loading/error/data state tracking for repeatedly invoked async actions.
//!
//! A [`TrackedAction`] wraps a parameterized async action and owns an
//! observable [`ActionState`] cell. Each `execute` resets the state to
//! loading, drives the call through the retry engine, and publishes the
//! terminal outcome, unless a newer `execute` superseded it, in which case
//! the outcome is discarded silently. The result: last-write-wins state, no
//! matter in which order overlapping calls complete.
//!
//! # Quick Start
//!
//! ```rust
//! use redrive::{ActionOptions, TrackedAction};
//!
//! # tokio_test::block_on(async {
//! let fetch = TrackedAction::new(
//!     |name: String| async move { Ok::<_, std::io::Error>(format!("hello {name}")) },
//!     ActionOptions::new().on_success(|greeting: &String| println!("{greeting}")),
//! );
//!
//! let greeting = fetch.execute("world".to_string()).await;
//! assert_eq!(greeting.as_deref(), Some("hello world"));
//! assert!(fetch.error().is_none());
//! # });
//! ```
//!
//! # Binding to a UI
//!
//! The controller is framework-agnostic: [`TrackedAction::subscribe`]
//! returns a `tokio::sync::watch::Receiver` that observes every
//! publication. A binding layer is expected to hold the controller for as
//! long as the action function's identity is stable, re-read the state on
//! change, and build a fresh controller when the action itself changes.
//!
//! # What "cancelling" means here
//!
//! There is no cancellation primitive. A superseded execution keeps
//! running: its operation and any remaining retries complete in the
//! background; only its effect on the shared state is suppressed. Actions
//! with external side effects observe those side effects regardless.

mod controller;
mod error;
mod state;

pub use controller::{ActionOptions, TrackedAction};
pub use error::ActionError;
pub use state::ActionState;

#[cfg(test)]
mod tests;
