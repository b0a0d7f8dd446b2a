//! Published state of a tracked action.

use crate::action::ActionError;

/// A snapshot of a tracked action's state: at most one of `data`/`error` is
/// populated, and `is_loading` is true only between the start of an
/// execution and its terminal publication.
///
/// The constructors are the only way to build a state, so the
/// one-of-data-or-error invariant holds for every value.
///
/// # Examples
///
/// ```rust
/// use redrive::ActionState;
///
/// let state = ActionState::success(42);
/// assert_eq!(state.data(), Some(&42));
/// assert!(state.error().is_none());
/// assert!(!state.is_loading());
/// ```
#[derive(Debug, Clone)]
pub struct ActionState<T> {
    data: Option<T>,
    error: Option<ActionError>,
    is_loading: bool,
}

impl<T> ActionState<T> {
    /// The state before any execution has started.
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }

    /// An execution is in flight; previous data and errors are cleared.
    pub fn loading() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }

    /// Terminal state after a successful execution.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_loading: false,
        }
    }

    /// Terminal state after a failed execution.
    pub fn failed(error: ActionError) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_loading: false,
        }
    }

    /// The successful result, if the latest execution succeeded.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The terminal error, if the latest execution failed.
    pub fn error(&self) -> Option<&ActionError> {
        self.error.as_ref()
    }

    /// Whether an execution is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

impl<T> Default for ActionState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
