use std::{collections::BTreeSet, fmt, iter, mem, num::NonZeroUsize, slice};

use tracing::{debug, trace};

use crate::{
    config::TableConfig,
    error::Result,
    hash::tentative_index,
    resolve::{Location, Resolution, SlotRef},
};

/// A key and its value, as stored in a slot
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    /// The key
    pub(crate) key: String,
    /// The value associated with the key
    pub(crate) value: V,
}

/// One storage cell: a bucket of the array or a node of an overflow chain
#[derive(Debug, Clone)]
pub(crate) struct Slot<V> {
    /// Stored pair, `None` while the slot is free
    pub(crate) entry: Option<Entry<V>>,
    /// Arena index of the next node in this slot's chain
    pub(crate) next: Option<usize>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self { entry: None, next: None }
    }
}

impl<V> Slot<V> {
    /// A slot can take `key` if it is free or already holds `key`
    pub(crate) fn accepts(&self, key: &str) -> bool {
        self.entry.as_ref().is_none_or(|entry| entry.key == key)
    }

    /// The value stored here if the slot holds `key`
    fn value_for(&self, key: &str) -> Option<&V> {
        self.entry.as_ref().filter(|entry| entry.key == key).map(|entry| &entry.value)
    }
}

/// A string-keyed hash table with a fixed number of buckets.
///
/// Keys are placed with a byte-average hash, bounded quadratic probing and, once probing
/// is exhausted, an overflow chain hanging off the key's home bucket. Nothing is ever
/// removed or moved, so a key stays at the location it was first committed to.
///
/// The table does no locking. Wrap it in [`SyncTable`](crate::SyncTable) to share it
/// between threads.
#[derive(Clone)]
pub struct Table<V> {
    /// The bucket array, allocated once
    pub(crate) buckets: Box<[Slot<V>]>,
    /// Arena owning every chain node; `Slot::next` indexes into it
    pub(crate) chains: Vec<Slot<V>>,
    /// Length of `buckets`
    pub(crate) bucket_count: NonZeroUsize,
    /// Configured load factor, never acted on
    max_load_factor: f64,
    /// Number of occupied slots, buckets and chain nodes alike
    len: usize,
    /// Every key ever set, in order
    key_set: BTreeSet<String>,
}

impl<V> fmt::Debug for Table<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("bucket_count", &self.bucket_count)
            .field("max_load_factor", &self.max_load_factor)
            .field("len", &self.len)
            .field("chain_nodes", &self.chains.len())
            .finish_non_exhaustive()
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Table<V> {
    /// Creates a table with the default 2,097,152 buckets and a max load factor of 0.75.
    #[must_use]
    pub fn new() -> Self {
        let config = TableConfig::default();
        let bucket_count = NonZeroUsize::new(config.bucket_count).unwrap_or(NonZeroUsize::MIN);
        Self::allocate(bucket_count, config.max_load_factor)
    }

    /// Creates a table with `bucket_count` buckets and the default load factor.
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`](crate::TableError::ZeroCapacity) for zero buckets.
    pub fn with_capacity(bucket_count: usize) -> Result<Self> {
        Self::with_config(TableConfig::default().with_bucket_count(bucket_count))
    }

    /// Creates a table from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`TableConfig::validate`] rejects.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        let bucket_count = config.validate()?;
        Ok(Self::allocate(bucket_count, config.max_load_factor))
    }

    /// Allocates the bucket array
    fn allocate(bucket_count: NonZeroUsize, max_load_factor: f64) -> Self {
        let buckets = iter::repeat_with(Slot::default).take(bucket_count.get()).collect();
        debug!(bucket_count = bucket_count.get(), max_load_factor, "Allocated table.");

        Self {
            buckets,
            chains: Vec::new(),
            bucket_count,
            max_load_factor,
            len: 0,
            key_set: BTreeSet::new(),
        }
    }

    /// Tentative bucket index of `key`, before any collision handling.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    pub fn hash(&self, key: &str) -> Result<usize> {
        tentative_index(key, self.bucket_count)
    }

    /// Stores `value` under `key`, returning the value it replaces.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key; the table is
    /// left untouched.
    ///
    /// # Panics
    ///
    /// Panics if a chain link the resolver relies on is missing, which means the table's
    /// internal state is corrupt.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>> {
        let key = key.into();
        let tentative = self.hash(&key)?;

        if !self.key_set.contains(&key) {
            self.key_set.insert(key.clone());
        }

        let (location, slot) = match self.resolve(tentative, &key) {
            Resolution::Settled { location, slot } => (location, slot),
            Resolution::Exhausted { location, tail } => (location, self.append_node(location, tail)),
        };
        trace!(key = %key, tentative, ?location, "Committed.");

        let slot = self.slot_mut(slot, location);
        if let Some(entry) = &mut slot.entry {
            return Ok(Some(mem::replace(&mut entry.value, value)));
        }

        slot.entry = Some(Entry { key, value });
        self.len = self.len.saturating_add(1);
        Ok(None)
    }

    /// Looks up `key`. A key that was never set gives `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the table's chain links are corrupt.
    pub fn get(&self, key: &str) -> Result<Option<&V>> {
        let tentative = self.hash(key)?;
        Ok(match self.resolve(tentative, key) {
            Resolution::Settled { location, slot } => self.slot(slot, location).value_for(key),
            Resolution::Exhausted { .. } => None,
        })
    }

    /// Mutable access to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the table's chain links are corrupt.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut V>> {
        let tentative = self.hash(key)?;
        Ok(match self.resolve(tentative, key) {
            Resolution::Settled { location, slot } => self
                .slot_mut(slot, location)
                .entry
                .as_mut()
                .filter(|entry| entry.key == key)
                .map(|entry| &mut entry.value),
            Resolution::Exhausted { .. } => None,
        })
    }

    /// Where `key` is stored, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the table's chain links are corrupt.
    pub fn locate(&self, key: &str) -> Result<Option<Location>> {
        let tentative = self.hash(key)?;
        Ok(match self.resolve(tentative, key) {
            Resolution::Settled { location, slot } => {
                self.slot(slot, location).value_for(key).map(|_| location)
            }
            Resolution::Exhausted { .. } => None,
        })
    }

    /// Returns true if `key` holds a value.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets, fixed at construction
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bucket_count.get()
    }

    /// The configured max load factor
    #[must_use]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Stored keys per bucket. Chained entries count too, so this can exceed 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.bucket_count.get() as f64
    }

    /// Number of chain nodes allocated so far
    #[must_use]
    pub fn chain_nodes(&self) -> usize {
        self.chains.len()
    }

    /// Every key ever passed to [`set`](Self::set), in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.key_set.iter().map(String::as_str)
    }

    /// Iterates over stored pairs: the bucket array first, then chain nodes in allocation
    /// order.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: self.buckets.iter().chain(self.chains.iter()) }
    }

    /// The bucket at `index`
    pub(crate) fn bucket(&self, index: usize) -> &Slot<V> {
        match self.buckets.get(index) {
            Some(slot) => slot,
            None => corrupt(Location::Bucket(index)),
        }
    }

    /// The chain node at arena position `node`, reached at `location`
    pub(crate) fn node(&self, node: usize, location: Location) -> &Slot<V> {
        match self.chains.get(node) {
            Some(slot) => slot,
            None => corrupt(location),
        }
    }

    /// Resolves a slot handle
    fn slot(&self, slot: SlotRef, location: Location) -> &Slot<V> {
        match slot {
            SlotRef::Bucket(index) => self.bucket(index),
            SlotRef::Node(node) => self.node(node, location),
        }
    }

    /// Resolves a slot handle for writing
    pub(crate) fn slot_mut(&mut self, slot: SlotRef, location: Location) -> &mut Slot<V> {
        let found = match slot {
            SlotRef::Bucket(index) => self.buckets.get_mut(index),
            SlotRef::Node(node) => self.chains.get_mut(node),
        };
        match found {
            Some(slot) => slot,
            None => corrupt(location),
        }
    }
}

/// A link the resolver walked to is gone. Only reachable through a bug in this crate.
#[cold]
#[allow(clippy::panic)]
fn corrupt(location: Location) -> ! {
    panic!("table corrupt: no slot behind {location:?}")
}

/// Iterator over the stored pairs of a [`Table`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Bucket array followed by the chain arena
    slots: iter::Chain<slice::Iter<'a, Slot<V>>, slice::Iter<'a, Slot<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .by_ref()
            .find_map(|slot| slot.entry.as_ref().map(|entry| (entry.key.as_str(), &entry.value)))
    }
}
