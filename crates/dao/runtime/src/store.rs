//! Keyed storage backing the resource and proposal stores
//!
//! `get` hands out owned snapshots: callers mutate a copy and write it back
//! with `set` once every fallible step has succeeded, so a failed operation
//! leaves the store untouched.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

/// Ordered key/value storage
pub trait KeyedStore<K, V>: Send + Sync {
    /// Insert or replace. Returns `true` if a value was replaced.
    fn set(&mut self, key: K, value: V) -> bool;

    fn get(&self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the key existed.
    fn remove(&mut self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit entries in ascending key order until `f` breaks.
    fn iterate(&self, f: &mut dyn FnMut(&K, &V) -> ControlFlow<()>);
}

/// `BTreeMap`-backed store, the default backend
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> KeyedStore<K, V> for MemoryStore<K, V>
where
    K: Ord + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&mut self, key: K, value: V) -> bool {
        self.entries.insert(key, value).is_some()
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iterate(&self, f: &mut dyn FnMut(&K, &V) -> ControlFlow<()>) {
        for (key, value) in &self.entries {
            if f(key, value).is_break() {
                break;
            }
        }
    }
}

/// Collect every value in key order
pub fn values<K, V, S>(store: &S) -> Vec<V>
where
    V: Clone,
    S: KeyedStore<K, V> + ?Sized,
{
    let mut out = Vec::with_capacity(store.len());
    store.iterate(&mut |_, value| {
        out.push(value.clone());
        ControlFlow::Continue(())
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_replacement() {
        let mut store = MemoryStore::new();
        assert!(!store.set("a", 1));
        assert!(store.set("a", 2));
        assert_eq!(store.get(&"a"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_reports_existence() {
        let mut store = MemoryStore::new();
        store.set(1u64, "x");
        assert!(store.remove(&1));
        assert!(!store.remove(&1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_iteration_is_ordered_and_stoppable() {
        let mut store = MemoryStore::new();
        for key in [3u64, 1, 2] {
            store.set(key, key * 10);
        }
        assert_eq!(values(&store), vec![10, 20, 30]);

        let mut first = None;
        store.iterate(&mut |key, _| {
            first = Some(*key);
            ControlFlow::Break(())
        });
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_get_returns_snapshot() {
        let mut store = MemoryStore::new();
        store.set("k", vec![1]);
        let mut copy = store.get(&"k").unwrap();
        copy.push(2);
        assert_eq!(store.get(&"k"), Some(vec![1]));
    }
}
