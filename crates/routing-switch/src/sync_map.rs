//! Map wrapper that never creates entries implicitly.
//!
//! Learning tables are easy to corrupt by accidentally inserting while
//! looking something up. `SyncMap` only exposes lookups that return
//! `Option` and a single explicit `insert`, plus bulk removal by predicate
//! for aging and purges.

use std::collections::HashMap;
use std::hash::Hash;

/// A map that never auto-creates entries.
///
/// # Example
///
/// ```
/// use routing_switch::SyncMap;
///
/// let mut map: SyncMap<u32, &str> = SyncMap::new();
/// assert!(map.get(&1).is_none());
/// assert!(map.is_empty());
///
/// map.insert(1, "one");
/// map.insert(2, "two");
/// let removed = map.remove_where(|k, _| *k > 1);
/// assert_eq!(removed, vec![(2, "two")]);
/// ```
#[derive(Debug, Clone)]
pub struct SyncMap<K, V> {
    inner: HashMap<K, V>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the value for `key`. **This never creates entries.**
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    /// Returns the value for `key` mutably. **This never creates entries.**
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.inner.get_mut(key)
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    /// Removes every entry matching `pred` and returns them.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
        K: Clone,
    {
        let keys: Vec<K> = self
            .inner
            .iter()
            .filter(|(k, v)| pred(k, v))
            .map(|(k, _)| k.clone())
            .collect();

        keys.into_iter()
            .filter_map(|k| self.inner.remove_entry(&k))
            .collect()
    }
}

impl<K, V> Default for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
