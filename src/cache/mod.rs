//! Cache Module
//!
//! Provides a byte-budgeted in-memory cache with FIFO eviction and a
//! thread-safe accessor that tracks hit statistics.

mod fifo;
mod safe;
mod size;
mod stats;
mod traits;


// Re-export public types
pub use fifo::{FifoStore, OnEvicted};
pub use safe::SafeCache;
pub use size::ByteSize;
pub use stats::Stat;
pub use traits::Cache;

// == Public Constants ==
/// Default byte budget for a cache (512 MiB)
pub const DEFAULT_MAX_BYTES: usize = 1 << 29;
