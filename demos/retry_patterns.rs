//! Retry Patterns Example
//!
//! Demonstrates the retry engine:
//! - Basic retry with a fixed delay
//! - Backoff strategies and how their delays grow
//! - Conditional retry with a custom classifier
//! - What callers see when the budget runs out

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use redrive::{exponential_backoff, retry, Backoff, RetryPolicy};

// ==================== Basic Retry ====================

/// Example 1: an operation that fails transiently twice, then succeeds.
async fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    let attempts = Arc::new(AtomicU32::new(0));

    let result = retry(
        {
            let attempts = attempts.clone();
            move || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                println!("  Attempt {}", n + 1);
                async move {
                    if n < 2 {
                        Err("NetworkError: flaky uplink".to_string())
                    } else {
                        Ok("success!")
                    }
                }
            }
        },
        &RetryPolicy::new()
            .with_max_retries(5)
            .with_delay(Duration::from_millis(100)),
    )
    .await;

    match result {
        Ok(value) => println!("Resolved with: {value}"),
        Err(failure) => println!("Gave up: {failure}"),
    }
}

// ==================== Backoff Strategies ====================

/// Example 2: how delays grow under different backoffs.
async fn example_backoff_strategies() {
    println!("\n=== Example 2: Backoff Strategies ===");

    let fixed = Backoff::fixed(Duration::from_millis(250));
    println!("Fixed delays:");
    for attempt in 1..=4 {
        println!("  Retry {}: {:?}", attempt, fixed.for_attempt(attempt));
    }

    let exponential = Backoff::exponential();
    println!("\nExponential delays:");
    for attempt in 1..=4 {
        println!("  Retry {}: {:?}", attempt, exponential.for_attempt(attempt));
    }

    let linear = Backoff::from_fn(|attempt| Duration::from_millis(50) * attempt);
    println!("\nLinear delays (custom function):");
    for attempt in 1..=4 {
        println!("  Retry {}: {:?}", attempt, linear.for_attempt(attempt));
    }

    println!(
        "\nexponential_backoff(1..=3): {:?} {:?} {:?}",
        exponential_backoff(1),
        exponential_backoff(2),
        exponential_backoff(3)
    );
}

// ==================== Conditional Retry ====================

#[derive(Debug)]
enum StoreError {
    Unavailable,
    CorruptRecord,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => f.write_str("store temporarily unavailable"),
            StoreError::CorruptRecord => f.write_str("record failed checksum"),
        }
    }
}

/// Example 3: a typed error taxonomy with its own classifier. Corrupt
/// records fail fast; unavailability is worth retrying.
async fn example_custom_classifier() {
    println!("\n=== Example 3: Custom Classifier ===");

    let policy = RetryPolicy::<StoreError>::new()
        .with_max_retries(3)
        .with_delay(Duration::from_millis(50))
        .with_classifier(|error| matches!(error, StoreError::Unavailable));

    let attempts = Arc::new(AtomicU32::new(0));
    let result: Result<(), _> = retry(
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::CorruptRecord) }
            }
        },
        &policy,
    )
    .await;

    println!(
        "Corrupt record: {} (after {} attempt(s))",
        result.unwrap_err(),
        attempts.load(Ordering::SeqCst)
    );
}

// ==================== Exhaustion ====================

/// Example 4: every attempt fails; the terminal error carries the last
/// failure and the attempt count.
async fn example_exhaustion() {
    println!("\n=== Example 4: Exhaustion ===");

    let result: Result<(), _> = retry(
        || async { Err("NetworkError: still down".to_string()) },
        &RetryPolicy::new()
            .with_max_retries(2)
            .with_delay(Duration::from_millis(50)),
    )
    .await;

    println!("Terminal failure: {}", result.unwrap_err());
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    example_basic_retry().await;
    example_backoff_strategies().await;
    example_custom_classifier().await;
    example_exhaustion().await;
}
