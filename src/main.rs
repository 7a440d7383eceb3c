//! FIFO Cache soak runner
//!
//! Builds a cache from environment configuration, drives it from several
//! threads, and prints a JSON report of the run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fifo_cache::{run_soak, Config, FifoStore, SafeCache};

/// Main entry point for the soak runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache with an eviction counter
/// 4. Run the soak workload and print the report
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fifo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate().context("loading configuration")?;
    info!(
        "Configuration loaded: max_bytes={}, workers={}, operations={}",
        config.max_bytes, config.workers, config.operations
    );

    let evictions = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&evictions);
    let store = FifoStore::from_config(&config).on_evicted(move |_key, _value: Vec<u8>| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    let cache = Arc::new(SafeCache::new(store));

    let report = run_soak(Arc::clone(&cache), &config).context("soak run failed")?;
    info!("Evicted {} entries", evictions.load(Ordering::Relaxed));

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
