//! FIFO Eviction Store
//!
//! Byte-budgeted ordered map. Entries live in a slot arena linked into a
//! doubly-linked list by index, oldest at the head; a hash index maps keys
//! to their slot. Reads never reorder; only (re-)insertion moves an entry
//! to the tail.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use ahash::RandomState;
use tracing::{debug, error};

use crate::cache::{ByteSize, Cache};
use crate::config::Config;

/// Callback invoked with each entry removed by eviction, `del` or `del_oldest`.
pub type OnEvicted<V> = Box<dyn FnMut(String, V) + Send + Sync>;

/// Slot in the insertion-order list
struct Node<V> {
    key: String,
    value: V,
    size: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

// == FIFO Store ==
/// Non-thread-safe FIFO cache bounded by total value size.
///
/// `max_bytes == 0` disables budget enforcement. Wrap in
/// [`SafeCache`](super::SafeCache) for shared access.
pub struct FifoStore<V, F = fn(&V) -> usize> {
    max_bytes: usize,
    used_bytes: usize,
    size_of: F,
    on_evicted: Option<OnEvicted<V>>,
    index: HashMap<String, usize, RandomState>,
    nodes: Vec<Option<Node<V>>>,
    /// Oldest entry, next to be evicted
    head: Option<usize>,
    /// Most recently set entry
    tail: Option<usize>,
    free_list: Vec<usize>,
}

impl<V: ByteSize> FifoStore<V> {
    // == Constructor ==
    /// Creates a store that charges each value its [`ByteSize`].
    pub fn new(max_bytes: usize) -> Self {
        Self::with_sizer(max_bytes, <V as ByteSize>::byte_size as fn(&V) -> usize)
    }

    /// Creates a store using the byte budget from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_bytes)
    }
}

impl<V, F> FifoStore<V, F>
where
    F: Fn(&V) -> usize,
{
    /// Creates a store with an explicit size estimator.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget, 0 for unbounded
    /// * `size_of` - Deterministic size of a value in bytes
    ///
    /// The sizes of all live entries must sum to at most `usize::MAX`; with
    /// `max_bytes == 0` nothing is evicted to keep the total down.
    pub fn with_sizer(max_bytes: usize, size_of: F) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            size_of,
            on_evicted: None,
            index: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
        }
    }

    /// Registers a callback run for every removed entry.
    ///
    /// The callback runs after the entry is fully removed. It must not block
    /// for long and must not re-enter the cache that owns this store.
    pub fn on_evicted<C>(mut self, callback: C) -> Self
    where
        C: FnMut(String, V) + Send + Sync + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }

    /// Configured byte budget.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys in eviction order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::successors(self.head, move |&idx| {
            self.nodes[idx].as_ref().and_then(|node| node.next)
        })
        .filter_map(move |idx| self.nodes[idx].as_ref().map(|node| node.key.as_str()))
    }

    /// The entry `del_oldest` would remove.
    pub fn peek_oldest(&self) -> Option<(&str, &V)> {
        self.head
            .and_then(|idx| self.nodes[idx].as_ref())
            .map(|node| (node.key.as_str(), &node.value))
    }

    // == Budget ==
    /// Evicts from the head until within budget. `keep` (the entry just
    /// written) is never evicted, so an oversized value stays alone.
    fn enforce_budget(&mut self, keep: usize) {
        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            match self.head {
                Some(idx) if idx != keep => self.del_oldest(),
                _ => break,
            }
        }
    }

    // == List Maintenance ==
    fn push_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.nodes[tail_idx] {
                    tail.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_back(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.nodes.push(None);
            self.nodes.len() - 1
        }
    }

    /// Unlinks and frees the slot, keeping index and byte count in step.
    fn remove_slot(&mut self, idx: usize) -> Option<(String, V)> {
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.size;
        Some((node.key, node.value))
    }

    fn notify_evicted(&mut self, key: String, value: V) {
        if let Some(callback) = self.on_evicted.as_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(key, value)));
            if outcome.is_err() {
                error!("eviction callback panicked; store state is unaffected");
            }
        }
    }

    /// Walks the list and checks it against the index and byte count.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut count = 0;
        let mut bytes = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref().expect("linked slot is occupied");
            assert_eq!(node.prev, prev, "broken back link at {}", node.key);
            assert_eq!(self.index.get(&node.key), Some(&idx));
            assert_eq!(node.size, (self.size_of)(&node.value));
            count += 1;
            bytes += node.size;
            prev = Some(idx);
            cursor = node.next;
        }
        assert_eq!(self.tail, prev);
        assert_eq!(count, self.index.len());
        assert_eq!(bytes, self.used_bytes);
    }
}

impl<V, F> Cache for FifoStore<V, F>
where
    F: Fn(&V) -> usize,
{
    type Value = V;

    // == Set ==
    /// Inserts at the tail, or replaces in place and moves to the tail.
    fn set(&mut self, key: String, value: V) {
        let size = (self.size_of)(&value);

        let idx = match self.index.get(&key) {
            Some(&idx) => {
                if let Some(node) = &mut self.nodes[idx] {
                    self.used_bytes = self.used_bytes - node.size + size;
                    node.size = size;
                    node.value = value;
                }
                self.move_to_back(idx);
                idx
            }
            None => {
                let idx = self.alloc_node();
                self.nodes[idx] = Some(Node {
                    key: key.clone(),
                    value,
                    size,
                    prev: None,
                    next: None,
                });
                self.index.insert(key, idx);
                self.used_bytes += size;
                self.push_back(idx);
                idx
            }
        };

        self.enforce_budget(idx);
    }

    // == Get ==
    fn get(&self, key: &str) -> Option<&V> {
        self.index
            .get(key)
            .and_then(|&idx| self.nodes[idx].as_ref())
            .map(|node| &node.value)
    }

    // == Delete ==
    fn del(&mut self, key: &str) {
        if let Some(idx) = self.index.get(key).copied() {
            if let Some((key, value)) = self.remove_slot(idx) {
                self.notify_evicted(key, value);
            }
        }
    }

    // == Delete Oldest ==
    fn del_oldest(&mut self) {
        if let Some(idx) = self.head {
            if let Some((key, value)) = self.remove_slot(idx) {
                debug!(key = %key, used_bytes = self.used_bytes, "evicted oldest entry");
                self.notify_evicted(key, value);
            }
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

impl<V, F> fmt::Debug for FifoStore<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoStore")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}
