//! Cache Capability Contract
//!
//! Policy-agnostic operations shared by every eviction store.

/// Operations an eviction store exposes to [`SafeCache`](super::SafeCache).
///
/// Implementations are not synchronized; callers serialize access.
pub trait Cache {
    /// Type of the stored values.
    type Value;

    /// Inserts or replaces the value for `key`, evicting entries if the
    /// byte budget is exceeded.
    fn set(&mut self, key: String, value: Self::Value);

    /// Returns the value for `key`, if present.
    fn get(&self, key: &str) -> Option<&Self::Value>;

    /// Removes `key`. No-op when absent.
    fn del(&mut self, key: &str);

    /// Removes the entry that would be evicted next. No-op when empty.
    fn del_oldest(&mut self);

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Sum of the sizes charged for live entries.
    fn used_bytes(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
