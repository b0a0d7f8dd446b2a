//! Default retry-eligibility classification.
//!
//! The reference policy is deliberately narrow: an error is transient only
//! if its rendered message carries one of the recognized network-failure
//! markers. Validation errors, 4xx-class errors, and anything unrecognized
//! are non-retryable. Callers with a richer taxonomy replace the predicate
//! via [`RetryPolicy::with_classifier`](crate::retry::RetryPolicy::with_classifier).

/// Message fragments that identify a transient network failure.
const TRANSIENT_MARKERS: &[&str] = &["Failed to fetch", "NetworkError"];

/// Whether a rendered error message signals a transient failure.
///
/// Matching is a case-sensitive substring check against the marker list.
///
/// # Examples
///
/// ```rust
/// use redrive::retry::is_transient_message;
///
/// assert!(is_transient_message("NetworkError when attempting to fetch resource"));
/// assert!(is_transient_message("TypeError: Failed to fetch"));
/// assert!(!is_transient_message("422 Unprocessable Entity"));
/// ```
pub fn is_transient_message(message: &str) -> bool {
    TRANSIENT_MARKERS.iter().any(|marker| message.contains(marker))
}

#[cfg(test)]
mod classify_tests {
    use super::*;

    #[test]
    fn test_recognizes_network_markers() {
        assert!(is_transient_message("NetworkError"));
        assert!(is_transient_message("fetch failed: NetworkError (dns)"));
        assert!(is_transient_message("Failed to fetch"));
        assert!(is_transient_message("TypeError: Failed to fetch /api/items"));
    }

    #[test]
    fn test_rejects_everything_else() {
        assert!(!is_transient_message("400 Bad Request"));
        assert!(!is_transient_message("validation failed"));
        assert!(!is_transient_message("Something went wrong"));
        assert!(!is_transient_message(""));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        // The markers are exact fragments of upstream error messages.
        assert!(!is_transient_message("networkerror"));
        assert!(!is_transient_message("failed to fetch"));
    }
}
