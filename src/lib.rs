//! FIFO Cache - A byte-budgeted in-process key/value cache
//!
//! Stores values under string keys, evicts the oldest-inserted entries once
//! the configured byte budget is exceeded, and tracks lookup statistics
//! behind a reader/writer lock.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{ByteSize, Cache, FifoStore, SafeCache, Stat, DEFAULT_MAX_BYTES};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{run_soak, SoakReport};
