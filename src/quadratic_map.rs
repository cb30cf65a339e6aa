use std::{fmt, mem};

use tracing::{debug, trace};

use crate::{
    dynamic_array::DynamicArray,
    hash::{HashFn, KeyHasher, default_hash},
    primes::{is_prime, next_prime},
    probe::ProbeSequence,
};

/// Capacity requested by [`QuadraticMap::new`]; rounded up to the prime 67
const DEFAULT_CAPACITY: usize = 64;

/// A live key-value pair
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// The state of one bucket
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never used since the bucket array was allocated
    Empty,
    /// Holds a live entry
    Live(Entry<V>),
    /// A removed entry. Only the key is kept, so probe chains running through this slot stay
    /// intact and a re-insert of the same key can revive it.
    Tombstone(String),
}

/// Outcome of walking the probe sequence for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key is live at this index
    Hit(usize),
    /// The key is absent; it belongs at this index (an empty slot or its own tombstone)
    Vacant(usize),
    /// Every reachable slot holds some other key, live or removed
    Exhausted,
}

/// A string-keyed hash map using open addressing with quadratic probing.
///
/// The number of buckets is always prime. Before an insertion would bring the load factor to
/// one half, the table is rebuilt at (the next prime above) twice its capacity. Removal leaves a
/// tombstone in the bucket; tombstones are purged only when the table is rebuilt.
///
/// The hash function is supplied at construction as any [`KeyHasher`]; maps built with
/// [`QuadraticMap::new`] use [`default_hash`].
///
/// Note: This implementation is not thread-safe.
#[derive(Clone)]
pub struct QuadraticMap<V, H = HashFn> {
    /// The buckets storing the key-value pairs; its length is the capacity
    buckets: DynamicArray<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Hash function mapping keys to their initial bucket
    hasher: H,
}

impl<V> QuadraticMap<V> {
    /// Creates an empty map with the default capacity and hash function
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with `next_prime(capacity)` buckets and the default hash function
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let hasher: HashFn = default_hash;
        Self::with_hasher(capacity, hasher)
    }
}

impl<V> Default for QuadraticMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: KeyHasher> QuadraticMap<V, H> {
    /// Creates an empty map with `next_prime(capacity)` buckets using `hasher` to place keys
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        Self { buckets: allocate_buckets(next_prime(capacity)), size: 0, hasher }
    }

    /// Walks the probe sequence of `key`.
    ///
    /// Returns the outcome together with the number of buckets examined.
    fn locate(&self, key: &str) -> (Probe, usize) {
        let mut probe = ProbeSequence::new(self.hasher.hash_key(key), self.buckets.length());

        while let Some(index) = probe.next() {
            match self.buckets.get(index) {
                Ok(Slot::Empty) => return (Probe::Vacant(index), probe.steps()),
                Ok(Slot::Live(entry)) if entry.key == key => {
                    return (Probe::Hit(index), probe.steps());
                }
                Ok(Slot::Tombstone(removed)) if removed == key => {
                    return (Probe::Vacant(index), probe.steps());
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }

        (Probe::Exhausted, probe.steps())
    }

    /// True when one more live entry would bring the load factor to one half or above
    fn needs_growth(&self) -> bool {
        self.size.saturating_add(1).saturating_mul(2) >= self.buckets.length()
    }

    /// Inserts a key-value pair, returning the previous value if the key was live.
    ///
    /// Grows the table first if the new entry would bring the load factor to one half. A
    /// removed key is revived in its old bucket.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();

        if self.needs_growth() {
            self.resize_table(self.capacity().saturating_mul(2));
        }

        loop {
            match self.locate(&key).0 {
                Probe::Hit(index) => {
                    return self
                        .buckets
                        .get_mut(index)
                        .ok()
                        .and_then(|slot| match slot {
                            Slot::Live(entry) => Some(mem::replace(&mut entry.value, value)),
                            Slot::Empty | Slot::Tombstone(_) => None,
                        });
                }
                Probe::Vacant(index) => {
                    if let Ok(Slot::Tombstone(_)) = self.buckets.get(index) {
                        trace!(key = %key, index, "Reviving removed entry.");
                    }
                    if self.buckets.set(index, Slot::Live(Entry { key, value })).is_ok() {
                        self.size = self.size.saturating_add(1);
                    }
                    return None;
                }
                Probe::Exhausted => {
                    // Tombstones of other keys cover the whole probe sequence. Rebuilding at
                    // the same capacity purges them.
                    debug!(key = %key, capacity = self.capacity(), "Probe sequence exhausted.");
                    self.resize_table(self.capacity());
                }
            }
        }
    }

    /// Retrieve the value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let Probe::Hit(index) = self.locate(key).0 else {
            return None;
        };

        match self.buckets.get(index) {
            Ok(Slot::Live(entry)) => Some(&entry.value),
            _ => None,
        }
    }

    /// Get a mutable reference to the value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let Probe::Hit(index) = self.locate(key).0 else {
            return None;
        };

        match self.buckets.get_mut(index) {
            Ok(Slot::Live(entry)) => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Returns true if `key` maps to a live entry
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self.locate(key).0, Probe::Hit(_))
    }

    /// Removes `key`, returning its value if it was live.
    ///
    /// The bucket becomes a tombstone. Removing an absent or already removed key does nothing.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let Probe::Hit(index) = self.locate(key).0 else {
            return None;
        };
        let slot = self.buckets.get_mut(index).ok()?;

        match mem::replace(slot, Slot::Empty) {
            Slot::Live(Entry { key, value }) => {
                *slot = Slot::Tombstone(key);
                self.size = self.size.saturating_sub(1);
                Some(value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuilds the table with at least `new_capacity` buckets.
    ///
    /// Does nothing if `new_capacity` is below the number of live entries. Otherwise the
    /// capacity is rounded up to a prime, a fresh bucket array is allocated and every live
    /// entry is re-inserted through [`put`](Self::put); tombstones are dropped. Re-insertion
    /// keeps the load factor below one half, so a small request may end with a larger table.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < self.size {
            return;
        }

        let new_capacity =
            if is_prime(new_capacity) { new_capacity } else { next_prime(new_capacity) };

        debug!(from = self.capacity(), to = new_capacity, live = self.size, "Resizing table.");

        let old = mem::replace(&mut self.buckets, allocate_buckets(new_capacity));
        self.size = 0;

        for slot in old {
            if let Slot::Live(Entry { key, value }) = slot {
                self.put(key, value);
            }
        }
    }

    /// Number of slots examined to resolve `key`, whether or not it is present
    #[must_use]
    pub fn probe_length(&self, key: &str) -> usize {
        self.locate(key).1
    }
}

impl<V, H> QuadraticMap<V, H> {
    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.length()
    }

    /// Returns the load factor, `len / capacity`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Returns `capacity - len`.
    ///
    /// Tombstones are counted as empty even though their buckets are not reused for other keys
    /// until the table is rebuilt.
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.capacity().saturating_sub(self.size)
    }

    /// Removes every entry and tombstone, keeping the capacity
    pub fn clear(&mut self) {
        debug!(capacity = self.capacity(), live = self.size, "Clearing table.");
        self.buckets = allocate_buckets(self.capacity());
        self.size = 0;
    }

    /// Returns an iterator over the live entries in bucket order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: &self.buckets, index: 0 }
    }

    /// Returns the live key-value pairs in bucket order
    #[must_use]
    pub fn get_keys_and_values(&self) -> DynamicArray<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }
}

/// Allocates `capacity` empty buckets
fn allocate_buckets<V>(capacity: usize) -> DynamicArray<Slot<V>> {
    DynamicArray::filled(capacity, || Slot::Empty)
}

impl<V: fmt::Debug, H> fmt::Debug for QuadraticMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadraticMap")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("entries", &DebugEntries(self))
            .finish_non_exhaustive()
    }
}

/// Formats the live entries of a map as a debug map
struct DebugEntries<'a, V, H>(&'a QuadraticMap<V, H>);

impl<V: fmt::Debug, H> fmt::Debug for DebugEntries<'_, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// One line per bucket: `"{index}: None"` for an empty bucket, otherwise
/// `"{index}: K: {key} V: {value} TS: {is_tombstone}"`. A tombstone's value is gone and printed
/// as `None`.
impl<V: fmt::Display, H> fmt::Display for QuadraticMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Live(entry) => {
                    writeln!(f, "{index}: K: {} V: {} TS: false", entry.key, entry.value)?;
                }
                Slot::Tombstone(key) => writeln!(f, "{index}: K: {key} V: None TS: true")?,
            }
        }
        Ok(())
    }
}

impl<K, V, H> Extend<(K, V)> for QuadraticMap<V, H>
where
    K: Into<String>,
    H: KeyHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for QuadraticMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Iterator over the live entries of a [`QuadraticMap`], in bucket order
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The bucket array being walked
    buckets: &'a DynamicArray<Slot<V>>,
    /// Next bucket to look at
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.buckets.length() {
            let slot = self.buckets.get(self.index).ok()?;
            self.index = self.index.saturating_add(1);
            if let Slot::Live(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.buckets.length().saturating_sub(self.index)))
    }
}

impl<'a, V, H> IntoIterator for &'a QuadraticMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over the live entries of a [`QuadraticMap`], in bucket order
#[derive(Debug)]
pub struct IntoIter<V> {
    /// The remaining buckets
    slots: std::vec::IntoIter<Slot<V>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Live(Entry { key, value }) => Some((key, value)),
            Slot::Empty | Slot::Tombstone(_) => None,
        })
    }
}

impl<V, H> IntoIterator for QuadraticMap<V, H> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { slots: self.buckets.into_iter() }
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use crate::hash::additive_hash;
    use proptest::prelude::*;

    /// Operations applied to both a `QuadraticMap` and a `std` map in the model test
    #[derive(Debug, Clone)]
    enum Op {
        /// `put(key, value)`
        Put(u8, i32),
        /// `remove(key)`
        Remove(u8),
        /// `resize_table(capacity)`
        Resize(usize),
    }

    /// Small key space so operations collide, remove and revive the same keys
    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..40, any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
            2 => (0u8..40).prop_map(Op::Remove),
            1 => (0usize..120).prop_map(Op::Resize),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_std_map(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut map = QuadraticMap::with_hasher(3, additive_hash);
            let mut model = std::collections::HashMap::new();

            for op in ops {
                match op {
                    Op::Put(key, value) => {
                        let key = format!("k{key}");
                        prop_assert_eq!(map.put(key.as_str(), value), model.insert(key, value));
                        prop_assert!(map.table_load() < 0.5);
                    }
                    Op::Remove(key) => {
                        let key = format!("k{key}");
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                    }
                    Op::Resize(capacity) => {
                        let before = map.capacity();
                        map.resize_table(capacity);
                        if capacity < model.len() {
                            prop_assert_eq!(map.capacity(), before);
                        } else {
                            prop_assert!(map.capacity() >= capacity);
                        }
                    }
                }

                prop_assert!(is_prime(map.capacity()));
                prop_assert_eq!(map.len(), model.len());
            }

            for key in 0u8..40 {
                let key = format!("k{key}");
                prop_assert_eq!(map.get(&key), model.get(&key));
                prop_assert_eq!(map.contains_key(&key), model.contains_key(&key));
            }
            prop_assert_eq!(map.iter().count(), model.len());
        }

        #[test]
        fn round_trip(key in ".{0,12}", value in any::<u64>()) {
            let mut map = QuadraticMap::new();
            map.put(key.as_str(), value);
            prop_assert_eq!(map.get(&key), Some(&value));
        }
    }
}
