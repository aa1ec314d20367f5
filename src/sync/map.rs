/*!
 * Synchronized Map
 *
 * Keyed access under the shared locking discipline of [`SyncContainer`].
 * Reads and inserts take the exclusive lock; first access to a missing key
 * default-constructs the value (map semantics, not get-or-fail).
 */

use super::container::SyncContainer;
use ahash::RandomState;
use std::collections::HashMap;
use std::hash::Hash;

/// Associative variant of the synchronized container family.
pub struct SyncMap<K, V> {
    container: SyncContainer<HashMap<K, V, RandomState>>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            container: SyncContainer::new(),
        }
    }

    /// Inserts a value, returning the previous one if the key was present.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.container.with_lock(|items| items.insert(key, value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.container.with_lock(|items| items.contains_key(key))
    }

    /// Returns a copy of the value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.container.with_lock(|items| items.get(key).cloned())
    }

    /// Applies `f` to the value for `key`, default-constructing it on first
    /// access. `f` must not touch this map; the lock is not reentrant.
    pub fn with_value<R>(&self, key: K, f: impl FnOnce(&mut V) -> R) -> R
    where
        V: Default,
    {
        self.container
            .with_lock(|items| f(items.entry(key).or_default()))
    }

    /// Applies `f` to every entry under the exclusive lock.
    pub fn for_each(&self, mut f: impl FnMut(&K, &mut V)) {
        self.container.with_lock(|items| {
            for (key, value) in items.iter_mut() {
                f(key, value);
            }
        });
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn clear(&self) {
        self.container.clear()
    }

    pub fn invalidate(&self) {
        self.container.invalidate()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_value_default_constructs_missing_entries() {
        let map: SyncMap<&str, u32> = SyncMap::new();
        let seen = map.with_value("counter", |value| {
            *value += 1;
            *value
        });
        assert_eq!(seen, 1);
        assert_eq!(map.get(&"counter"), Some(1));
    }

    #[test]
    fn insert_replaces_and_reports_previous() {
        let map = SyncMap::new();
        assert_eq!(map.insert("k", 1), None);
        assert_eq!(map.insert("k", 2), Some(1));
        assert_eq!(map.len(), 1);
    }
}
