//! The sequenced action controller.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;

use crate::action::{ActionError, ActionState};
use crate::retry::{retry, Backoff, RetryError, RetryPolicy};

type BoxedAction<Args, T, E> =
    Box<dyn Fn(Args) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;
type SuccessHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&ActionError) + Send + Sync>;

/// Options for a [`TrackedAction`]: the retry policy plus optional
/// side-effect hooks fired on non-stale terminal outcomes.
///
/// The default retry policy swaps the engine's fixed delay for
/// [`Backoff::exponential`]; an action that is re-invoked by a UI wants
/// growing backoff out of the box.
///
/// # Examples
///
/// ```rust
/// use redrive::{ActionOptions, RetryPolicy};
/// use std::time::Duration;
///
/// let options: ActionOptions<String, std::io::Error> = ActionOptions::new()
///     .with_retry(RetryPolicy::new().with_max_retries(1).with_delay(Duration::from_millis(50)))
///     .on_success(|data| println!("got {data}"))
///     .on_error(|error| eprintln!("failed: {error}"));
/// ```
pub struct ActionOptions<T, E> {
    retry: RetryPolicy<E>,
    on_success: Option<SuccessHook<T>>,
    on_error: Option<ErrorHook>,
}

impl<T, E: fmt::Display> ActionOptions<T, E> {
    /// Options with the default retry policy (exponential backoff) and no
    /// hooks.
    pub fn new() -> Self {
        Self {
            retry: RetryPolicy::new().with_backoff(Backoff::exponential()),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T, E: fmt::Display> Default for ActionOptions<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> ActionOptions<T, E> {
    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy<E>) -> Self {
        self.retry = retry;
        self
    }

    /// Set the maximum number of retries on the current policy.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.retry = self.retry.with_max_retries(n);
        self
    }

    /// Use a fixed delay between attempts on the current policy.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.retry = self.retry.with_delay(delay);
        self
    }

    /// Use the given backoff on the current policy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.retry = self.retry.with_backoff(backoff);
        self
    }

    /// Hook fired once per non-stale successful execution.
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Hook fired once per non-stale failed execution.
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ActionError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// The retry policy executions run under.
    pub fn retry_policy(&self) -> &RetryPolicy<E> {
        &self.retry
    }
}

impl<T, E> Clone for ActionOptions<T, E> {
    fn clone(&self) -> Self {
        Self {
            retry: self.retry.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T, E> fmt::Debug for ActionOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionOptions")
            .field("retry", &self.retry)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Wraps a parameterized async action with loading/error/data state
/// tracking, retry-with-backoff, and stale-response suppression.
///
/// Every [`execute`](TrackedAction::execute) stamps the invocation with a
/// monotonically increasing request id. An outcome is published to the
/// observable state only if its stamp is still the latest at publication
/// time, so overlapping calls resolve last-write-wins: a slow first call
/// that settles after a fast second call never overwrites the second
/// call's state. Suppression applies to *publication* only: superseded
/// work is not cancelled and runs to completion in the background.
///
/// The state lives in a `tokio::sync::watch` cell owned by the controller.
/// [`state`](TrackedAction::state) reads a snapshot;
/// [`subscribe`](TrackedAction::subscribe) hands a receiver to reactive
/// bindings, which are responsible for re-rendering on change and for
/// creating a new controller when the action function itself changes.
///
/// # Examples
///
/// ```rust
/// use redrive::{ActionOptions, TrackedAction};
///
/// # tokio_test::block_on(async {
/// let lookup = TrackedAction::new(
///     |id: u32| async move { Ok::<_, std::io::Error>(id * 2) },
///     ActionOptions::new(),
/// );
///
/// let result = lookup.execute(21).await;
/// assert_eq!(result, Some(42));
/// assert_eq!(lookup.data(), Some(42));
/// assert!(!lookup.is_loading());
/// # });
/// ```
pub struct TrackedAction<Args, T, E> {
    action: BoxedAction<Args, T, E>,
    options: Mutex<ActionOptions<T, E>>,
    latest: Mutex<u64>,
    state: watch::Sender<ActionState<T>>,
}

impl<Args, T, E> TrackedAction<Args, T, E>
where
    Args: Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    /// Wrap `action` with state tracking under the given options.
    ///
    /// `Args` must be `Clone`: the retry engine may invoke the action
    /// several times per execution.
    pub fn new<F, Fut>(action: F, options: ActionOptions<T, E>) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (state, _) = watch::channel(ActionState::idle());
        Self {
            action: Box::new(move |args| action(args).boxed()),
            options: Mutex::new(options),
            latest: Mutex::new(0),
            state,
        }
    }

    /// Run the action with `args`, tracking the execution in the
    /// observable state.
    ///
    /// Returns `Some(value)` when this invocation succeeded and was still
    /// the latest at publication time; `None` when it failed (the error is
    /// readable from [`error`](TrackedAction::error) and was passed to
    /// `on_error`) or when a newer invocation superseded it (nothing was
    /// published and no hook fired). Failures are never returned as `Err`
    /// from `execute`.
    ///
    /// Calling `execute` again before a prior call settles is legal at all
    /// times; each call uses a snapshot of the options current at entry.
    pub async fn execute(&self, args: Args) -> Option<T> {
        let options = lock(&self.options).clone();
        let stamp = {
            // Stamping and the loading publication form one step; a
            // concurrent execute may not observe one without the other.
            let mut latest = lock(&self.latest);
            *latest += 1;
            self.state.send_replace(ActionState::loading());
            *latest
        };

        let outcome = retry(|| (self.action)(args.clone()), options.retry_policy()).await;

        match outcome {
            Ok(value) => {
                if !self.publish(stamp, ActionState::success(value.clone())) {
                    return None;
                }
                if let Some(hook) = &options.on_success {
                    hook(&value);
                }
                Some(value)
            }
            Err(failure) => {
                let error = normalize(failure);
                if !self.publish(stamp, ActionState::failed(error.clone())) {
                    return None;
                }
                if let Some(hook) = &options.on_error {
                    hook(&error);
                }
                None
            }
        }
    }

    /// Publish `next` if `stamp` is still the latest invocation.
    ///
    /// The stamp comparison and the state write happen under one lock, so
    /// publications never interleave.
    fn publish(&self, stamp: u64, next: ActionState<T>) -> bool {
        let latest = lock(&self.latest);
        if *latest != stamp {
            tracing::debug!(stamp, latest = *latest, "stale result ignored");
            return false;
        }
        self.state.send_replace(next);
        true
    }

    /// Replace the options used by subsequent `execute` calls.
    ///
    /// In-flight executions keep the snapshot they started with.
    pub fn reconfigure(&self, options: ActionOptions<T, E>) {
        *lock(&self.options) = options;
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> ActionState<T> {
        self.state.borrow().clone()
    }

    /// The latest successful result, if the state holds one.
    pub fn data(&self) -> Option<T> {
        self.state.borrow().data().cloned()
    }

    /// The latest terminal error, if the state holds one.
    pub fn error(&self) -> Option<ActionError> {
        self.state.borrow().error().cloned()
    }

    /// Whether an execution is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// A receiver that observes every state publication.
    pub fn subscribe(&self) -> watch::Receiver<ActionState<T>> {
        self.state.subscribe()
    }
}

impl<Args, T, E> fmt::Debug for TrackedAction<Args, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedAction")
            .field("latest", &*lock(&self.latest))
            .finish_non_exhaustive()
    }
}

/// Collapse a terminal retry failure into the published error: the
/// underlying last error where one exists, its message otherwise.
fn normalize<E: StdError + Send + Sync + 'static>(failure: RetryError<E>) -> ActionError {
    let message = failure.to_string();
    match failure.into_error() {
        Some(error) => ActionError::new(error),
        None => ActionError::from_message(message),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
