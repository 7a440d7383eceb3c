//! Error types for the cache crate
//!
//! Cache operations themselves are total; these errors cover configuration
//! and the soak workload that drives the cache.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Soak workload failed (worker panic or broken invariant)
    #[error("Workload failed: {0}")]
    Workload(String),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
