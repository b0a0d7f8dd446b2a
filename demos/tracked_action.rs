//! Tracked Action Example
//!
//! Demonstrates the sequenced action controller:
//! - Driving an async action with loading/error/data state
//! - Success and error hooks
//! - Stale-response suppression when calls overlap

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use redrive::{ActionOptions, TrackedAction};

#[derive(Debug, Clone)]
struct SearchError(String);

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SearchError {}

/// A pretend search service whose latency depends on the query.
async fn search(query: String) -> Result<Vec<String>, SearchError> {
    let latency = Duration::from_millis(20 * query.len() as u64);
    tokio::time::sleep(latency).await;

    if query.is_empty() {
        return Err(SearchError("empty query".to_string()));
    }
    Ok(vec![format!("{query}-1"), format!("{query}-2")])
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let action = Arc::new(TrackedAction::new(
        search,
        ActionOptions::new()
            .with_max_retries(1)
            .with_delay(Duration::from_millis(100))
            .on_success(|hits: &Vec<String>| println!("  hook: {} hit(s)", hits.len()))
            .on_error(|error| println!("  hook: search failed: {error}")),
    ));

    // A plain successful execution.
    println!("=== single query ===");
    let hits = action.execute("rust".to_string()).await;
    println!("published data: {:?} (returned {:?})", action.data(), hits);

    // A failing execution; execute resolves with None, the error lives in
    // the state.
    println!("\n=== failing query ===");
    let missing = action.execute(String::new()).await;
    println!(
        "returned {:?}, state error: {:?}",
        missing,
        action.error().map(|e| e.to_string())
    );

    // Overlapping executions: the longer first query loses to the shorter
    // second one no matter which finishes first.
    println!("\n=== overlapping queries ===");
    let slow = {
        let action = Arc::clone(&action);
        tokio::spawn(async move { action.execute("a-very-long-query".to_string()).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    let fast = {
        let action = Arc::clone(&action);
        tokio::spawn(async move { action.execute("ok".to_string()).await })
    };

    let fast_hits = fast.await.expect("fast task panicked");
    let slow_hits = slow.await.expect("slow task panicked");
    println!("fast returned {fast_hits:?}");
    println!("slow returned {slow_hits:?} (superseded)");
    println!("published data: {:?}", action.data());
}
