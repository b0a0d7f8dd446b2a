//! Behaviour tests for the sequenced action controller.

use super::*;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Failure {
    Network,
    Rejected,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Network => f.write_str("NetworkError: connection lost"),
            Failure::Rejected => f.write_str("request rejected"),
        }
    }
}

impl std::error::Error for Failure {}

fn quick_options<T>() -> ActionOptions<T, Failure> {
    ActionOptions::new().with_max_retries(0)
}

#[tokio::test]
async fn test_success_publishes_data_and_returns_value() {
    let double = TrackedAction::new(
        |n: u32| async move { Ok::<_, Failure>(n * 2) },
        quick_options(),
    );

    let result = double.execute(4).await;

    assert_eq!(result, Some(8));
    assert_eq!(double.data(), Some(8));
    assert!(double.error().is_none());
    assert!(!double.is_loading());
}

#[tokio::test]
async fn test_failure_resolves_none_and_publishes_error() {
    let failing = TrackedAction::new(
        |_: ()| async { Err::<u32, _>(Failure::Rejected) },
        quick_options(),
    );

    let result = failing.execute(()).await;

    assert_eq!(result, None);
    assert!(failing.data().is_none());
    let error = failing.error().map(|e| e.to_string());
    assert_eq!(error, Some("request rejected".to_string()));
    assert!(!failing.is_loading());
}

#[tokio::test]
async fn test_terminal_state_holds_exactly_one_outcome() {
    let flaky = TrackedAction::new(
        |fail: bool| async move {
            if fail {
                Err(Failure::Rejected)
            } else {
                Ok("fine")
            }
        },
        quick_options(),
    );

    flaky.execute(false).await;
    let state = flaky.state();
    assert!(state.data().is_some() && state.error().is_none());
    assert!(!state.is_loading());

    flaky.execute(true).await;
    let state = flaky.state();
    assert!(state.data().is_none() && state.error().is_some());
    assert!(!state.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_slow_first_call_never_overwrites_fast_second_call() {
    let controller = Arc::new(TrackedAction::new(
        |(label, delay_ms): (&'static str, u64)| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok::<_, Failure>(label)
        },
        quick_options(),
    ));

    let slow = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.execute(("first", 80)).await })
    };
    // Let the first call stamp itself before the second one starts.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let fast = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.execute(("second", 10)).await })
    };

    let fast_result = fast.await.expect("fast task panicked");
    let slow_result = slow.await.expect("slow task panicked");

    assert_eq!(fast_result, Some("second"));
    assert_eq!(slow_result, None); // superseded, silently discarded
    assert_eq!(controller.data(), Some("second"));
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_hooks_fire_once_per_non_stale_outcome() {
    let successes = Arc::new(AtomicU32::new(0));
    let errors = Arc::new(AtomicU32::new(0));

    let options = {
        let successes = Arc::clone(&successes);
        let errors = Arc::clone(&errors);
        quick_options()
            .on_success(move |_: &&str| {
                successes.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            })
    };

    let flaky = TrackedAction::new(
        |fail: bool| async move {
            if fail {
                Err(Failure::Rejected)
            } else {
                Ok("fine")
            }
        },
        options,
    );

    flaky.execute(false).await;
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 0);

    flaky.execute(true).await;
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_outcomes_fire_no_hooks() {
    let successes = Arc::new(AtomicU32::new(0));
    let errors = Arc::new(AtomicU32::new(0));

    let options = {
        let successes = Arc::clone(&successes);
        let errors = Arc::clone(&errors);
        quick_options()
            .on_success(move |_: &&str| {
                successes.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            })
    };

    // The slow call fails, the fast one succeeds; only the fast outcome
    // may reach the hooks.
    let controller = Arc::new(TrackedAction::new(
        |(fail, delay_ms): (bool, u64)| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if fail {
                Err(Failure::Rejected)
            } else {
                Ok("fine")
            }
        },
        options,
    ));

    let slow = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.execute((true, 80)).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let fast = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.execute((false, 10)).await })
    };

    assert_eq!(fast.await.expect("fast task panicked"), Some("fine"));
    assert_eq!(slow.await.expect("slow task panicked"), None);

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    assert_eq!(controller.data(), Some("fine"));
}

#[tokio::test]
async fn test_execute_retries_through_the_engine() {
    let calls = Arc::new(AtomicU32::new(0));

    let controller = TrackedAction::new(
        {
            let calls = Arc::clone(&calls);
            move |_: ()| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Failure::Network)
                    } else {
                        Ok("recovered")
                    }
                }
            }
        },
        ActionOptions::new()
            .with_max_retries(3)
            .with_delay(Duration::from_millis(1)),
    );

    let result = controller.execute(()).await;

    assert_eq!(result, Some("recovered"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_reconfigure_applies_to_subsequent_executions() {
    let successes = Arc::new(AtomicU32::new(0));

    let controller = TrackedAction::new(
        |n: u32| async move { Ok::<_, Failure>(n) },
        quick_options(),
    );

    controller.execute(1).await;
    assert_eq!(successes.load(Ordering::SeqCst), 0); // no hook configured yet

    controller.reconfigure({
        let successes = Arc::clone(&successes);
        quick_options().on_success(move |_| {
            successes.fetch_add(1, Ordering::SeqCst);
        })
    });

    controller.execute(2).await;
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(controller.data(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_loading_is_observable_while_in_flight() {
    let controller = Arc::new(TrackedAction::new(
        |_: ()| async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok::<_, Failure>("done")
        },
        quick_options(),
    ));

    let mut states = controller.subscribe();

    let running = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.execute(()).await })
    };

    states.changed().await.expect("controller dropped");
    assert!(states.borrow_and_update().is_loading());

    states.changed().await.expect("controller dropped");
    {
        let terminal = states.borrow_and_update();
        assert!(!terminal.is_loading());
        assert_eq!(terminal.data(), Some(&"done"));
    }

    assert_eq!(running.await.expect("task panicked"), Some("done"));
}

#[tokio::test]
async fn test_each_execution_clears_the_previous_outcome() {
    let flaky = TrackedAction::new(
        |fail: bool| async move {
            if fail {
                Err(Failure::Rejected)
            } else {
                Ok(7)
            }
        },
        quick_options(),
    );

    flaky.execute(true).await;
    assert!(flaky.error().is_some());

    flaky.execute(false).await;
    assert!(flaky.error().is_none());
    assert_eq!(flaky.data(), Some(7));
}
