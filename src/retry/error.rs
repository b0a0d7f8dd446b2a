//! Error types for retry operations.

use std::fmt;

/// Error returned when [`retry`](crate::retry::retry) gives up.
///
/// The wrapped error is always the last one the operation produced; the
/// variant records why no further attempt was made.
///
/// # Examples
///
/// ```rust
/// use redrive::{retry, RetryError, RetryPolicy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let policy = RetryPolicy::new()
///     .with_max_retries(2)
///     .with_delay(Duration::from_millis(1));
///
/// let result: Result<(), _> = retry(
///     || async { Err("NetworkError".to_string()) },
///     &policy,
/// )
/// .await;
///
/// match result {
///     Err(RetryError::Exhausted { error, attempts }) => {
///         assert_eq!(error, "NetworkError");
///         assert_eq!(attempts, 3); // 1 initial + 2 retries
///     }
///     _ => panic!("expected exhaustion"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error and the budget ran out.
    Exhausted {
        /// The error from the final attempt.
        error: E,
        /// Total number of attempts made (initial + retries).
        attempts: u32,
    },
    /// An attempt failed with an error the classifier declined to retry.
    NonRetryable {
        /// The non-retryable error.
        error: E,
        /// Total number of attempts made before giving up.
        attempts: u32,
    },
    /// The retry loop exited without producing a result or an error.
    ///
    /// Unreachable under correct control flow; surfaced instead of
    /// panicking if it ever happens.
    Unexpected,
}

impl<E> RetryError<E> {
    /// A reference to the underlying error, if one was recorded.
    pub fn error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { error, .. } | RetryError::NonRetryable { error, .. } => {
                Some(error)
            }
            RetryError::Unexpected => None,
        }
    }

    /// Extract the underlying error, discarding attempt metadata.
    pub fn into_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { error, .. } | RetryError::NonRetryable { error, .. } => {
                Some(error)
            }
            RetryError::Unexpected => None,
        }
    }

    /// How many attempts were made, if any were recorded.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::NonRetryable { attempts, .. } => {
                Some(*attempts)
            }
            RetryError::Unexpected => None,
        }
    }

    /// Returns true if the retry budget was exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Returns true if the error was classified non-retryable.
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable { .. })
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { error, attempts } => {
                write!(f, "retry exhausted after {} attempts: {}", attempts, error)
            }
            RetryError::NonRetryable { error, attempts } => {
                write!(f, "non-retryable error on attempt {}: {}", attempts, error)
            }
            RetryError::Unexpected => f.write_str("retry loop terminated unexpectedly"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { error, .. } | RetryError::NonRetryable { error, .. } => {
                Some(error)
            }
            RetryError::Unexpected => None,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_exhausted_display() {
        let err = RetryError::Exhausted {
            error: "connection reset",
            attempts: 4,
        };
        let display = format!("{}", err);
        assert!(display.contains("retry exhausted"));
        assert!(display.contains("4 attempts"));
        assert!(display.contains("connection reset"));
    }

    #[test]
    fn test_non_retryable_display() {
        let err = RetryError::NonRetryable {
            error: "403 Forbidden",
            attempts: 1,
        };
        let display = format!("{}", err);
        assert!(display.contains("non-retryable"));
        assert!(display.contains("attempt 1"));
        assert!(display.contains("403 Forbidden"));
    }

    #[test]
    fn test_unexpected_display() {
        let err: RetryError<String> = RetryError::Unexpected;
        assert_eq!(format!("{}", err), "retry loop terminated unexpectedly");
    }

    #[test]
    fn test_accessors() {
        let err = RetryError::Exhausted {
            error: "boom".to_string(),
            attempts: 2,
        };
        assert_eq!(err.error(), Some(&"boom".to_string()));
        assert_eq!(err.attempts(), Some(2));
        assert!(err.is_exhausted());
        assert!(!err.is_non_retryable());
        assert_eq!(err.into_error(), Some("boom".to_string()));

        let unexpected: RetryError<String> = RetryError::Unexpected;
        assert_eq!(unexpected.error(), None);
        assert_eq!(unexpected.attempts(), None);
        assert_eq!(unexpected.into_error(), None);
    }
}
