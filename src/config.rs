//! Configuration Module
//!
//! Handles loading cache and soak-workload configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_MAX_BYTES;
use crate::error::{CacheError, Result};

/// Cache and soak configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Byte budget for cached values (0 disables eviction)
    pub max_bytes: usize,
    /// Number of soak worker threads
    pub workers: usize,
    /// Operations performed by each soak worker
    pub operations: usize,
    /// Number of distinct keys the soak workload touches
    pub key_space: usize,
    /// Size in bytes of every value written by the soak workload
    pub value_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_BYTES` - Byte budget (default: 512 MiB)
    /// - `SOAK_WORKERS` - Worker threads (default: 4)
    /// - `SOAK_OPERATIONS` - Operations per worker (default: 10000)
    /// - `SOAK_KEY_SPACE` - Distinct keys (default: 1024)
    /// - `SOAK_VALUE_SIZE` - Value size in bytes (default: 64)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_bytes: env_or("MAX_BYTES", defaults.max_bytes),
            workers: env_or("SOAK_WORKERS", defaults.workers),
            operations: env_or("SOAK_OPERATIONS", defaults.operations),
            key_space: env_or("SOAK_KEY_SPACE", defaults.key_space),
            value_size: env_or("SOAK_VALUE_SIZE", defaults.value_size),
        }
    }

    /// Rejects settings the soak workload cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CacheError::InvalidConfig(
                "SOAK_WORKERS must be greater than 0".to_string(),
            ));
        }
        if self.key_space == 0 {
            return Err(CacheError::InvalidConfig(
                "SOAK_KEY_SPACE must be greater than 0".to_string(),
            ));
        }
        if self.value_size == 0 {
            return Err(CacheError::InvalidConfig(
                "SOAK_VALUE_SIZE must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            workers: 4,
            operations: 10_000,
            key_space: 1_024,
            value_size: 64,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
