use std::fmt::Debug;
use std::hash::Hash;
use std::collections::HashMap;
use std::ops::Index;
use std::slice;

/// A store of values indexable by key or position.
///
/// Values iterate in insertion order regardless of key hashing, which
/// keeps every computation over a store deterministic. Values cannot be
/// removed. Inserting an already-present key returns the previous value
/// rather than silently overwriting; callers treat that as an error.
#[derive(Debug, Clone)]
pub struct MapStore<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    indices: HashMap<K, usize>,
}

impl<K, V> MapStore<K, V> where K: Clone + Eq + Hash + Debug {
    pub fn new() -> MapStore<K, V> {
        MapStore {
            keys: Vec::new(),
            values: Vec::new(),
            indices: HashMap::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> MapStore<K, V> {
        MapStore {
            keys: Vec::with_capacity(cap),
            values: Vec::with_capacity(cap),
            indices: HashMap::with_capacity(cap),
        }
    }

    /// Inserts `value` under `key`, returning the displaced value if the
    /// key was already present (the stored order is left untouched).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.indices.get(&key) {
            Some(&idx) => {
                Some(::std::mem::replace(&mut self.values[idx], value))
            },
            None => {
                self.indices.insert(key.clone(), self.values.len());
                self.keys.push(key);
                self.values.push(value);
                None
            },
        }
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.indices.get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.indices.contains_key(key)
    }

    pub fn by_key(&self, key: &K) -> Option<&V> {
        self.index_of(key).map(|idx| &self.values[idx])
    }

    pub fn by_key_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index_of(key) {
            Some(idx) => self.values.get_mut(idx),
            None => None,
        }
    }

    #[inline]
    pub fn by_index(&self, idx: usize) -> Option<&V> {
        self.values.get(idx)
    }

    #[inline]
    pub fn by_index_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.values.get_mut(idx)
    }

    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> MapStoreIter<K, V> {
        MapStoreIter {
            keys: self.keys.iter(),
            values: self.values.iter(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> Index<usize> for MapStore<K, V> where K: Clone + Eq + Hash + Debug {
    type Output = V;

    #[inline]
    fn index(&self, idx: usize) -> &V {
        &self.values[idx]
    }
}

pub struct MapStoreIter<'a, K: 'a, V: 'a> {
    keys: slice::Iter<'a, K>,
    values: slice::Iter<'a, V>,
}

impl<'a, K, V> Iterator for MapStoreIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        match (self.keys.next(), self.values.next()) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }
}
