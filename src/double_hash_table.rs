use std::{fmt, iter, mem};

use log::{debug, error, trace, warn};

use crate::{
    error::TableError,
    primes::{cursor_below, prime_at},
};

/// Capacity used by [`DoubleHashTable::new`]
pub const DEFAULT_CAPACITY: usize = 8;

/// Smallest capacity a table is created with
pub const MIN_CAPACITY: usize = 4;

/// Multiplier of the polynomial string hash
const HASH_MULTIPLIER: u128 = 181;

/// A key-value pair held by an occupied bin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The key the entry was inserted under
    key: String,
    /// The value associated with the key
    value: V,
}

impl<V> Entry<V> {
    /// Returns the key of the entry
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value of the entry
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// State of a single bin
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<V> {
    /// Never written since the bin was allocated
    Empty,
    /// Holds a live entry
    Occupied(Entry<V>),
    /// Held an entry that has since been removed
    Tombstone,
}

/// A string-keyed hash table using open addressing with double hashing.
///
/// The start bin of a key comes from a polynomial string hash modulo the capacity, and
/// the probe step from the same hash modulo the largest prime below the capacity, forced
/// odd. Capacities are powers of two, so every step is coprime with the capacity and a
/// probe sequence visits each bin exactly once.
///
/// Removal is lazy: a removed entry leaves a tombstone that keeps probe chains intact
/// until an insert reuses it or the table grows. The table doubles as soon as half of
/// its bins hold live entries.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct DoubleHashTable<V> {
    /// The bins storing the entries
    bins: Vec<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Index into the prime table of the largest prime below the capacity
    prime_cursor: usize,
}

impl<V> Default for DoubleHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for DoubleHashTable<V>
where
    K: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            if let Err(err) = self.insert(key, value) {
                warn!("Skipping pair while extending table: {err}");
            }
        }
    }
}

impl<V> DoubleHashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] bins
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` bins.
    ///
    /// The capacity is raised to [`MIN_CAPACITY`] and rounded up to a power of two, so
    /// `with_capacity(10)` has 16 bins. Equality and the [`Display`](fmt::Display) dump
    /// see the rounded capacity: `with_capacity(10) == with_capacity(16)` and both dump
    /// 16 lines.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY).next_power_of_two();

        Self { bins: empty_bins(capacity), size: 0, prime_cursor: cursor_below(capacity) }
    }

    /// Start bin of `key`, or `None` for an empty key
    fn primary_hash(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        Some(polynomial_hash(key, self.capacity()))
    }

    /// Probe step of `key`, or `None` for an empty key. Always odd.
    #[allow(clippy::arithmetic_side_effects)]
    fn secondary_hash(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        let prime = prime_at(self.prime_cursor);
        // polynomial_hash < prime, so the step is in 1..=prime
        let step = prime - polynomial_hash(key, prime);
        Some(if step % 2 == 0 { step + 1 } else { step })
    }

    /// Returns the bins `key` probes, in order, for the current capacity.
    ///
    /// The sequence yields exactly [`capacity`](Self::capacity) distinct indices. Returns
    /// `None` for an empty key.
    #[must_use]
    pub fn probe_sequence(&self, key: &str) -> Option<ProbeSequence> {
        Some(ProbeSequence {
            next: self.primary_hash(key)?,
            step: self.secondary_hash(key)?,
            capacity: self.capacity(),
            remaining: self.capacity(),
        })
    }

    /// Walks `probes` until the first empty bin or a live entry for `key`.
    ///
    /// Returns the matching index, if any, and the number of bins examined.
    fn scan(&self, probes: ProbeSequence, key: &str) -> (Option<usize>, usize) {
        let mut examined: usize = 0;
        for index in probes {
            examined = examined.saturating_add(1);
            match self.bins.get(index) {
                None | Some(Slot::Empty) => return (None, examined),
                Some(Slot::Occupied(entry)) if entry.key == key => return (Some(index), examined),
                Some(_) => {}
            }
        }
        (None, examined)
    }

    /// Index of the live entry for `key`
    fn find(&self, key: &str) -> Option<usize> {
        self.scan(self.probe_sequence(key)?, key).0
    }

    /// Picks the bin an insert of `key` writes to.
    ///
    /// The start bin is taken if it is empty, holds `key`, or is a tombstone. Past the
    /// start bin only an empty bin or a live `key` ends the walk. A walk that meets
    /// neither has shown `key` is not live, so it falls back to the first tombstone seen.
    fn resolve_insert(&self, key: &str) -> Result<usize, TableError> {
        let mut probes = self.probe_sequence(key).ok_or(TableError::InvalidKey)?;

        if let Some(start) = probes.next() {
            match self.bins.get(start) {
                Some(Slot::Empty) => return Ok(start),
                Some(Slot::Occupied(entry)) if entry.key == key => return Ok(start),
                Some(Slot::Tombstone) => {
                    // A live copy further down the chain must be overwritten, not shadowed
                    return Ok(self.scan(probes, key).0.unwrap_or(start));
                }
                _ => {}
            }
        }

        let mut reusable = None;
        for index in probes {
            match self.bins.get(index) {
                Some(Slot::Empty) => return Ok(index),
                Some(Slot::Occupied(entry)) if entry.key == key => return Ok(index),
                Some(Slot::Tombstone) if reusable.is_none() => reusable = Some(index),
                _ => {}
            }
        }
        if let Some(index) = reusable {
            return Ok(index);
        }

        error!("No bin found for key {key:?} across {} bins", self.capacity());
        Err(TableError::ProbeExhausted { capacity: self.capacity() })
    }

    /// Inserts a key-value pair, returning the previous value of a live `key`.
    ///
    /// Overwriting a live key leaves [`len`](Self::len) unchanged. The table grows before
    /// returning if the insert brought the load factor to one half.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidKey`] if `key` is empty, in which case the table is untouched.
    /// [`TableError::ProbeExhausted`] if no bin could take the key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, TableError> {
        let key = key.into();
        let index = self.resolve_insert(&key)?;
        let capacity = self.capacity();
        let Some(bin) = self.bins.get_mut(index) else {
            return Err(TableError::ProbeExhausted { capacity });
        };

        match mem::replace(bin, Slot::Occupied(Entry { key, value })) {
            Slot::Occupied(previous) => Ok(Some(previous.value)),
            Slot::Empty | Slot::Tombstone => {
                self.size = self.size.saturating_add(1);
                if self.size.saturating_mul(2) >= self.capacity() {
                    self.grow()?;
                }
                Ok(None)
            }
        }
    }

    /// Returns the entry stored under `key`
    #[must_use]
    pub fn get_entry(&self, key: &str) -> Option<&Entry<V>> {
        if self.size == 0 {
            return None;
        }
        match self.bins.get(self.find(key)?) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Returns the value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_entry(key).map(Entry::value)
    }

    /// Returns the stored key and value for `key`
    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.get_entry(key).map(|entry| (entry.key(), entry.value()))
    }

    /// Returns true if a live entry exists for `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get_entry(key).is_some()
    }

    /// Removes the entry for `key`, leaving a tombstone in its bin, and returns its value.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidKey`] if `key` is empty and [`TableError::NotFound`] if no
    /// live entry exists for it. The table is unchanged in both cases.
    pub fn remove(&mut self, key: &str) -> Result<V, TableError> {
        if key.is_empty() {
            return Err(TableError::InvalidKey);
        }
        let not_found = || TableError::NotFound(key.to_owned());
        if self.size == 0 {
            return Err(not_found());
        }

        let index = self.find(key).ok_or_else(not_found)?;
        let bin = self.bins.get_mut(index).ok_or_else(not_found)?;
        match mem::replace(bin, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                trace!("Tombstoned bin {index} holding key {key:?}");
                Ok(entry.value)
            }
            other => {
                *bin = other;
                Err(not_found())
            }
        }
    }

    /// Doubles the capacity and re-inserts every live entry, dropping tombstones.
    ///
    /// Keys are placed in a fresh layout before any entry moves, so a failed placement
    /// leaves the table as it was.
    fn grow(&mut self) -> Result<(), TableError> {
        let new_capacity = self.capacity().saturating_mul(2);
        debug!(
            "Growing table from {} to {} bins with {} live entries",
            self.capacity(),
            new_capacity,
            self.size
        );

        // Maps each key to the old bin holding its entry
        let mut layout = DoubleHashTable::<usize>::with_capacity(new_capacity);
        for (old_index, slot) in self.bins.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                layout.insert(entry.key.as_str(), old_index)?;
            }
        }

        let mut old_bins = mem::take(&mut self.bins);
        self.bins = layout
            .bins
            .into_iter()
            .map(|slot| {
                let Slot::Occupied(Entry { value: old_index, .. }) = slot else {
                    return Slot::Empty;
                };
                match old_bins.get_mut(old_index).map(|old| mem::replace(old, Slot::Empty)) {
                    Some(occupied @ Slot::Occupied(_)) => occupied,
                    _ => Slot::Empty,
                }
            })
            .collect();
        self.prime_cursor = layout.prime_cursor;
        self.size = layout.size;
        Ok(())
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of bins
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bins.len()
    }

    /// Returns the ratio of live entries to bins
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.bins.len() as f64
    }

    /// Returns the number of tombstoned bins
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.bins.iter().filter(|bin| matches!(bin, Slot::Tombstone)).count()
    }

    /// Returns how many bins a lookup of `key` examines, or `None` for an empty key
    #[must_use]
    pub fn probe_length(&self, key: &str) -> Option<usize> {
        Some(self.scan(self.probe_sequence(key)?, key).1)
    }

    /// Returns an iterator over the live key-value pairs in bin order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { bins: self.bins.iter() }
    }

    /// Empties every bin, keeping the capacity
    pub fn clear(&mut self) {
        for bin in &mut self.bins {
            *bin = Slot::Empty;
        }
        self.size = 0;
    }
}

/// Allocates `capacity` empty bins
fn empty_bins<V>(capacity: usize) -> Vec<Slot<V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Folds `h = 181 * h + codepoint` over the characters of `key`, modulo `modulus`.
///
/// Reducing at every step gives the same result as reducing the full polynomial once.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn polynomial_hash(key: &str, modulus: usize) -> usize {
    let modulus = modulus.max(1) as u128;
    let hash = key
        .chars()
        .fold(0, |hash, c| (HASH_MULTIPLIER * hash + u128::from(u32::from(c))) % modulus);
    hash as usize
}

impl<V: PartialEq> PartialEq for DoubleHashTable<V> {
    /// Tables are equal when capacity, size and every bin match, tombstones included
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.size == other.size && self.bins == other.bins
    }
}

impl<V: Eq> Eq for DoubleHashTable<V> {}

impl<V: fmt::Debug> fmt::Display for DoubleHashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bin) in self.bins.iter().enumerate() {
            match bin {
                Slot::Empty => writeln!(f, "[{index}]: Empty")?,
                Slot::Tombstone => writeln!(f, "[{index}]: Tombstone")?,
                Slot::Occupied(entry) => {
                    writeln!(f, "[{index}]: Entry({:?}, {:?})", entry.key, entry.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Bins visited by a key, `(start + j * step) % capacity` for `j` in `0..capacity`
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Next index to yield
    next: usize,
    /// Distance between consecutive probes
    step: usize,
    /// Number of bins in the table
    capacity: usize,
    /// Probes left before the sequence repeats
    remaining: usize,
}

impl ProbeSequence {
    /// Returns the distance between consecutive probes
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = (self.next + self.step) % self.capacity;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Iterator over the live key-value pairs of a table
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Remaining bins
    bins: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.bins.by_ref().find_map(|bin| match bin {
            Slot::Occupied(entry) => Some((entry.key.as_str(), &entry.value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

impl<'a, V> IntoIterator for &'a DoubleHashTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
