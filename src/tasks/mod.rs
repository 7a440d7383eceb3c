//! Background Tasks Module
//!
//! Contains workloads that drive the cache from multiple threads.

mod soak;

pub use soak::{run_soak, SoakReport};
