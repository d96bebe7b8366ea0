//! BDD test runner for the Todo Manager stories
//!
//! Runs every feature file under `features/` once, in file order, against a
//! running Todo Manager (`TODO_MANAGER_URL`, default `http://localhost:4567`).
//! Skips with a notice when the service cannot be reached.
//!
//! # Usage
//!
//! ```bash
//! cargo test -p todomanager-stories --test bdd -- --nocapture
//! ```

// Allow panic/expect in test code - these are appropriate for test setup
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use todomanager_client::lifecycle::wait_until_ready;
use todomanager_client::{ClientConfig, TodoManagerClient};
use todomanager_stories::features::default_features_dir;
use todomanager_stories::harness::FeatureExecutor;
use todomanager_stories::suite::CucumberExecutor;

/// Readiness probes before the stories are skipped.
const PROBE_ATTEMPTS: u32 = 3;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .init();

    let features_dir = default_features_dir();
    if !features_dir.exists() {
        panic!("Features directory not found: {}", features_dir.display());
    }

    let config = ClientConfig::from_env();
    let client = TodoManagerClient::from_config(&config).expect("Failed to build HTTP client");
    if let Err(e) = wait_until_ready(&client, PROBE_ATTEMPTS, config.ready_interval).await {
        eprintln!("Skipping Todo Manager stories: {e}");
        return;
    }

    let executor = CucumberExecutor::new(&config);
    let passed = executor
        .execute(std::slice::from_ref(&features_dir))
        .await
        .expect("Feature run failed to start");
    assert!(passed, "Some Todo Manager scenarios failed");
}
