//! Soak Workload
//!
//! Hammers a shared cache with concurrent writers and readers, then checks
//! that byte accounting and the budget held throughout.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{Cache, SafeCache, Stat};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Outcome of a completed soak run.
#[derive(Debug, Clone, Serialize)]
pub struct SoakReport {
    /// Total `set` calls across workers
    pub sets: u64,
    /// Total `get` calls across workers
    pub gets: u64,
    /// Entries left in the cache
    pub entries: usize,
    /// Bytes charged for the remaining entries
    pub used_bytes: usize,
    /// Lookup statistics reported by the cache
    pub stat: Stat,
    /// Wall-clock duration of the run
    pub elapsed_ms: u128,
}

#[derive(Default)]
struct WorkerTally {
    sets: u64,
    gets: u64,
    corrupt: u64,
}

/// Runs the soak workload described by `config` against `cache`.
///
/// Each of `config.workers` threads performs `config.operations` calls: one
/// `set` in four, the rest `get`. Every value written for a key is filled
/// with the same byte, so a read of any other content is reported as
/// corruption.
///
/// # Returns
/// A report on success, or `CacheError::Workload` if a worker panicked or
/// an invariant did not hold afterward.
pub fn run_soak<C>(cache: Arc<SafeCache<C>>, config: &Config) -> Result<SoakReport>
where
    C: Cache<Value = Vec<u8>> + Send + Sync + 'static,
{
    config.validate()?;
    info!(
        "Starting soak: workers={}, operations={}, key_space={}, value_size={}",
        config.workers, config.operations, config.key_space, config.value_size
    );

    let started = Instant::now();
    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            let config = config.clone();
            thread::spawn(move || run_worker(&cache, worker, &config))
        })
        .collect();

    let mut total = WorkerTally::default();
    for (worker, handle) in handles.into_iter().enumerate() {
        let tally = handle
            .join()
            .map_err(|_| CacheError::Workload(format!("worker {} panicked", worker)))?;
        debug!(worker, sets = tally.sets, gets = tally.gets, "worker finished");
        total.sets += tally.sets;
        total.gets += tally.gets;
        total.corrupt += tally.corrupt;
    }

    let report = SoakReport {
        sets: total.sets,
        gets: total.gets,
        entries: cache.len(),
        used_bytes: cache.used_bytes(),
        stat: cache.stat(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    verify(&report, total.corrupt, config)?;
    info!(
        "Soak complete: {} sets, {} gets, {} hits in {}ms",
        report.sets, report.gets, report.stat.hits, report.elapsed_ms
    );
    Ok(report)
}

fn run_worker<C>(cache: &SafeCache<C>, worker: usize, config: &Config) -> WorkerTally
where
    C: Cache<Value = Vec<u8>>,
{
    let mut tally = WorkerTally::default();

    for i in 0..config.operations {
        let slot = (worker * 31 + i * 17) % config.key_space;
        let key = format!("soak:{}", slot);
        let fill = (slot % 251) as u8;

        if i % 4 == 0 {
            cache.set(key, vec![fill; config.value_size]);
            tally.sets += 1;
        } else {
            let intact = cache.get_with(&key, |value| {
                value.len() == config.value_size && value.iter().all(|&b| b == fill)
            });
            if intact == Some(false) {
                tally.corrupt += 1;
            }
            tally.gets += 1;
        }
    }

    tally
}

fn verify(report: &SoakReport, corrupt: u64, config: &Config) -> Result<()> {
    if corrupt > 0 {
        return Err(CacheError::Workload(format!(
            "{} reads returned corrupted values",
            corrupt
        )));
    }
    if report.used_bytes != report.entries * config.value_size {
        return Err(CacheError::Workload(format!(
            "accounting drift: {} bytes charged for {} entries of {} bytes",
            report.used_bytes, report.entries, config.value_size
        )));
    }
    if config.max_bytes > 0 && report.entries > 1 && report.used_bytes > config.max_bytes {
        return Err(CacheError::Workload(format!(
            "budget exceeded: {} > {}",
            report.used_bytes, config.max_bytes
        )));
    }
    if report.stat.gets != report.gets || report.stat.hits > report.stat.gets {
        return Err(CacheError::Workload(format!(
            "stat mismatch: {:?} after {} gets",
            report.stat, report.gets
        )));
    }
    Ok(())
}
