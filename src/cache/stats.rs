//! Cache Statistics Module
//!
//! Immutable lookup statistics reported by the accessor.

use serde::Serialize;

// == Stat ==
/// Snapshot of lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stat {
    /// Lookups that returned a value
    pub hits: u64,
    /// Total lookups
    pub gets: u64,
}

impl Stat {
    // == Misses ==
    /// Lookups that returned nothing.
    pub fn misses(&self) -> u64 {
        self.gets.saturating_sub(self.hits)
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_default() {
        let stat = Stat::default();
        assert_eq!(stat.hits, 0);
        assert_eq!(stat.gets, 0);
        assert_eq!(stat.misses(), 0);
        assert_eq!(stat.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stat = Stat { hits: 1, gets: 4 };
        assert_eq!(stat.misses(), 3);
        assert_eq!(stat.hit_rate(), 0.25);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let stat = Stat { hits: 3, gets: 3 };
        assert_eq!(stat.hit_rate(), 1.0);
    }

    #[test]
    fn test_stat_serializes() {
        let json = serde_json::to_value(Stat { hits: 2, gets: 5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "hits": 2, "gets": 5 }));
    }
}
