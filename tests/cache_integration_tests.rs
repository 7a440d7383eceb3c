//! Integration Tests for the Cache API
//!
//! Drives the public accessor from multiple threads and checks the
//! observable invariants afterward.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use fifo_cache::{Cache, FifoStore, SafeCache, Stat};
use parking_lot::Mutex;

// == Helper Functions ==

fn value_of(len: usize, fill: u8) -> Vec<u8> {
    vec![fill; len]
}

// == Scenario Tests ==

#[test]
fn test_budget_scenario_through_accessor() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let store = FifoStore::new(10).on_evicted(move |key, _value: Vec<u8>| sink.lock().push(key));
    let cache = SafeCache::new(store);

    cache.set("A", value_of(4, b'a'));
    cache.set("B", value_of(4, b'b'));
    cache.set("C", value_of(4, b'c'));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.used_bytes(), 8);
    assert_eq!(cache.get("A"), None);
    assert_eq!(cache.get("B"), Some(value_of(4, b'b')));
    assert_eq!(cache.stat(), Stat { hits: 1, gets: 2 });
    assert_eq!(*evicted.lock(), vec!["A".to_string()]);
}

#[test]
fn test_delete_through_accessor_fires_callback() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let store = FifoStore::new(0).on_evicted(move |key, _value: String| sink.lock().push(key));
    let cache = SafeCache::new(store);

    cache.set("A", "1".to_string());
    cache.set("B", "2".to_string());
    cache.del("missing");
    assert!(evicted.lock().is_empty());

    cache.del("B");
    cache.del_oldest();

    assert!(cache.is_empty());
    assert_eq!(*evicted.lock(), vec!["B".to_string(), "A".to_string()]);
}

// == Concurrency Tests ==

#[test]
fn test_concurrent_writers_and_readers_keep_accounting() {
    const VALUE_LEN: usize = 32;
    const BUDGET: usize = VALUE_LEN * 20;

    let cache = Arc::new(SafeCache::new(FifoStore::new(BUDGET)));

    let writers: Vec<_> = (0..4usize)
        .map(|writer| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1_000usize {
                    let slot = (i * 13 + writer) % 50;
                    cache.set(format!("key{}", slot), value_of(VALUE_LEN, slot as u8));
                    let used = cache.used_bytes();
                    assert_eq!(used % VALUE_LEN, 0, "torn byte count {}", used);
                    assert!(used <= BUDGET);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000usize {
                    let slot = i % 50;
                    if let Some(value) = cache.get(&format!("key{}", slot)) {
                        assert_eq!(value, value_of(VALUE_LEN, slot as u8));
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    let stat = cache.stat();
    assert_eq!(stat.gets, 4 * 2_000);
    assert!(stat.hits <= stat.gets);
    assert!(cache.used_bytes() <= BUDGET);
    assert_eq!(cache.used_bytes(), cache.len() * VALUE_LEN);
}

#[test]
fn test_concurrent_stat_never_reports_more_hits_than_gets() {
    let cache = Arc::new(SafeCache::new(FifoStore::new(0)));
    cache.set("hot", "v".to_string());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..5_000 {
                    assert!(cache.get("hot").is_some());
                }
            })
        })
        .collect();

    for _ in 0..1_000 {
        let stat = cache.stat();
        assert!(stat.hits <= stat.gets, "{:?}", stat);
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(cache.stat(), Stat { hits: 20_000, gets: 20_000 });
}

// == Policy Substitution ==

/// Unbounded map with no ordering, standing in for another policy
#[derive(Default)]
struct MapStore {
    map: HashMap<String, u64>,
}

impl Cache for MapStore {
    type Value = u64;

    fn set(&mut self, key: String, value: u64) {
        self.map.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<&u64> {
        self.map.get(key)
    }

    fn del(&mut self, key: &str) {
        self.map.remove(key);
    }

    fn del_oldest(&mut self) {}

    fn len(&self) -> usize {
        self.map.len()
    }

    fn used_bytes(&self) -> usize {
        self.map.len() * std::mem::size_of::<u64>()
    }
}

#[test]
fn test_accessor_accepts_other_policies() {
    let cache = SafeCache::new(MapStore::default());
    cache.set("a", 1);
    cache.set("b", 2);

    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("z"), None);
    assert_eq!(cache.used_bytes(), 16);
    assert_eq!(cache.stat(), Stat { hits: 1, gets: 2 });
}
