//! Retry policy types and configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::retry::classify::is_transient_message;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

type Classifier<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A retry policy describing how failed operations are retried.
///
/// Policies are data plus one injected decision: how many retries to budget,
/// how long to wait between attempts, and which errors are worth retrying at
/// all. This makes them easy to clone, inspect, and share between callers.
///
/// # Defaults
///
/// - `max_retries`: 3 (up to 4 total attempts)
/// - backoff: fixed 1000 ms between attempts
/// - classifier: the transient-message policy from
///   [`is_transient_message`](crate::retry::is_transient_message)
///
/// # Examples
///
/// ```rust
/// use redrive::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::<String>::new()
///     .with_max_retries(5)
///     .with_delay(Duration::from_millis(250));
///
/// assert_eq!(policy.max_retries(), 5);
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
/// ```
///
/// Broadening the retry-eligibility predicate:
///
/// ```rust
/// use redrive::RetryPolicy;
///
/// #[derive(Debug)]
/// enum ApiError { RateLimited, BadRequest }
/// # impl std::fmt::Display for ApiError {
/// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
/// #         write!(f, "{:?}", self)
/// #     }
/// # }
///
/// let policy = RetryPolicy::<ApiError>::new()
///     .with_classifier(|error| matches!(error, ApiError::RateLimited));
///
/// assert!(policy.is_retryable(&ApiError::RateLimited));
/// assert!(!policy.is_retryable(&ApiError::BadRequest));
/// ```
pub struct RetryPolicy<E> {
    max_retries: u32,
    backoff: Backoff,
    classify: Classifier<E>,
}

/// The delay between attempts: a fixed duration, or a function of the
/// 1-based index of the upcoming retry.
#[derive(Clone)]
pub enum Backoff {
    /// The same delay before every retry.
    Fixed(Duration),
    /// Delay computed from the retry index (1 for the first retry).
    Computed(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    /// Fixed delay between attempts.
    pub fn fixed(delay: Duration) -> Self {
        Backoff::Fixed(delay)
    }

    /// Delay computed per retry from a function of the 1-based retry index.
    ///
    /// The function must return a duration for every index ≥ 1; `Duration`
    /// guarantees non-negativity by construction.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Backoff::Computed(Arc::new(f))
    }

    /// The doubling backoff from [`exponential_backoff`].
    pub fn exponential() -> Self {
        Backoff::Computed(Arc::new(exponential_backoff))
    }

    /// The delay before the given retry (1-based).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Backoff;
    /// use std::time::Duration;
    ///
    /// let fixed = Backoff::fixed(Duration::from_millis(500));
    /// assert_eq!(fixed.for_attempt(1), Duration::from_millis(500));
    /// assert_eq!(fixed.for_attempt(7), Duration::from_millis(500));
    ///
    /// let linear = Backoff::from_fn(|attempt| Duration::from_millis(100) * attempt);
    /// assert_eq!(linear.for_attempt(3), Duration::from_millis(300));
    /// ```
    pub fn for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Computed(f) => f(attempt),
        }
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Backoff::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<E: fmt::Display> RetryPolicy<E> {
    /// Create a policy with the default budget, delay, and classifier.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::Fixed(DEFAULT_DELAY),
            classify: Arc::new(|error: &E| is_transient_message(&error.to_string())),
        }
    }
}

impl<E: fmt::Display> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RetryPolicy<E> {
    /// Set the maximum number of retry attempts.
    ///
    /// This does not include the initial attempt: `with_max_retries(3)`
    /// means up to 4 total attempts.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Use a fixed delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.backoff = Backoff::Fixed(delay);
        self
    }

    /// Use the given backoff between attempts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::{Backoff, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::<String>::new().with_backoff(Backoff::exponential());
    ///
    /// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
    /// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
    /// assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
    /// ```
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the retry-eligibility predicate.
    ///
    /// The default classifier only recognizes transient network failures by
    /// their rendered message; callers with a typed error taxonomy should
    /// supply their own predicate.
    pub fn with_classifier<F>(mut self, classify: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.classify = Arc::new(classify);
        self
    }

    /// Get the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the backoff.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Whether the classifier considers this error worth retrying.
    pub fn is_retryable(&self, error: &E) -> bool {
        (self.classify)(error)
    }

    /// The delay before the given retry (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.for_attempt(attempt)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            backoff: self.backoff.clone(),
            classify: Arc::clone(&self.classify),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

/// Doubling backoff starting at 100 ms: 100 ms, 200 ms, 400 ms, ... for
/// retries 1, 2, 3, ...
///
/// The argument is the 1-based retry index the engine is about to wait out.
/// Arithmetic saturates rather than overflowing for very large indices.
///
/// # Examples
///
/// ```rust
/// use redrive::exponential_backoff;
/// use std::time::Duration;
///
/// assert_eq!(exponential_backoff(1), Duration::from_millis(100));
/// assert_eq!(exponential_backoff(2), Duration::from_millis(200));
/// assert_eq!(exponential_backoff(3), Duration::from_millis(400));
/// ```
pub fn exponential_backoff(attempt: u32) -> Duration {
    Duration::from_millis(100).saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}
