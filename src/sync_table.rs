use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    config::TableConfig,
    error::Result,
    resolve::Location,
    stats::TableStats,
    table::Table,
};

/// A [`Table`] behind a single table-wide `RwLock`.
///
/// `set` takes the write lock, lookups share the read lock. Values come back as clones
/// because no reference may outlive the guard.
#[derive(Debug)]
pub struct SyncTable<V> {
    /// The wrapped table
    inner: RwLock<Table<V>>,
}

impl<V> Default for SyncTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Table<V>> for SyncTable<V> {
    fn from(table: Table<V>) -> Self {
        Self { inner: RwLock::new(table) }
    }
}

impl<V> SyncTable<V> {
    /// Creates a table with the default bucket count and load factor
    #[must_use]
    pub fn new() -> Self {
        Table::new().into()
    }

    /// Creates a table from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`TableConfig::validate`] rejects.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Table::with_config(config).map(Self::from)
    }

    /// Acquires the read lock.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while holding the lock.
    #[allow(clippy::expect_used)]
    fn read(&self) -> RwLockReadGuard<'_, Table<V>> {
        self.inner.read().expect("Failed to acquire read lock on table")
    }

    /// Acquires the write lock.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while holding the lock.
    #[allow(clippy::expect_used)]
    fn write(&self) -> RwLockWriteGuard<'_, Table<V>> {
        self.inner.write().expect("Failed to acquire write lock on table")
    }

    /// Runs `f` against the table under the read lock.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn with_table<R>(&self, f: impl FnOnce(&Table<V>) -> R) -> R {
        f(&self.read())
    }

    /// Stores `value` under `key`, returning the value it replaces.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<Option<V>> {
        self.write().set(key, value)
    }

    /// Tentative bucket index of `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn hash(&self, key: &str) -> Result<usize> {
        self.read().hash(key)
    }

    /// Where `key` is stored, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn locate(&self, key: &str) -> Result<Option<Location>> {
        self.read().locate(key)
    }

    /// Returns true if `key` holds a value.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.read().contains_key(key)
    }

    /// Number of stored keys
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no key has been stored
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of buckets
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    /// Placement statistics of the current contents
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        self.read().stats()
    }

    /// Unwraps the table.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn into_inner(self) -> Table<V> {
        self.inner.into_inner().expect("Failed to take table out of lock")
    }
}

impl<V: Clone> SyncTable<V> {
    /// Looks up `key` and clones its value.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`](crate::TableError::EmptyKey) for an empty key.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.read().get(key)?.cloned())
    }
}
