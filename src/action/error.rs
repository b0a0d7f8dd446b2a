//! Normalized errors surfaced through action state.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// The normalized error published to [`ActionState`](crate::ActionState)
/// and passed to `on_error` hooks.
///
/// `ActionError` is a cheaply cloneable handle (`Arc` inside), so the same
/// terminal error can live in the observable state cell, flow to hooks, and
/// be inspected by callers without copying the underlying error.
///
/// Normalization: a value that already is a proper error is wrapped as-is
/// ([`ActionError::new`]); anything that only has a string representation
/// is converted through [`ActionError::from_message`].
#[derive(Debug, Clone)]
pub struct ActionError(Arc<dyn StdError + Send + Sync + 'static>);

impl ActionError {
    /// Wrap an existing error, preserving it as the `source`.
    pub fn new(error: impl StdError + Send + Sync + 'static) -> Self {
        Self(Arc::new(error))
    }

    /// Build an error from a bare message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::ActionError;
    ///
    /// let error = ActionError::from_message("upstream returned garbage");
    /// assert_eq!(error.to_string(), "upstream returned garbage");
    /// ```
    pub fn from_message(message: impl Into<String>) -> Self {
        Self(Arc::new(MessageError(message.into())))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl StdError for ActionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

/// A message with no richer error behind it.
#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageError {}
