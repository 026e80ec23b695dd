//! Utility functions and traits shared by [`Table`] and [`SyncTable`]

use crate::{SyncTable, Table, error::Result};

/// Extension trait for bulk reads that hand back owned data
pub trait TableExtensions<V> {
    /// Returns the stored keys as a Vec, in no particular order
    fn stored_keys(&self) -> Vec<String>;

    /// Returns the stored values as a Vec, in no particular order
    fn values(&self) -> Vec<V>;

    /// Returns the stored pairs as a Vec, in no particular order
    fn entries(&self) -> Vec<(String, V)>;
}

impl<V: Clone> TableExtensions<V> for Table<V> {
    fn stored_keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn entries(&self) -> Vec<(String, V)> {
        self.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect()
    }
}

impl<V: Clone> TableExtensions<V> for SyncTable<V> {
    fn stored_keys(&self) -> Vec<String> {
        self.with_table(Table::stored_keys)
    }

    fn values(&self) -> Vec<V> {
        self.with_table(Table::values)
    }

    fn entries(&self) -> Vec<(String, V)> {
        self.with_table(Table::entries)
    }
}

/// Creates a `Table` with `bucket_count` buckets from an iterator of key-value pairs.
///
/// # Errors
///
/// Stops at the first pair `set` rejects, or fails up front for a zero bucket count.
pub fn from_pairs<K, V, I>(bucket_count: usize, pairs: I) -> Result<Table<V>>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = Table::with_capacity(bucket_count)?;
    for (key, value) in pairs {
        table.set(key, value)?;
    }
    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TableError;

    #[test]
    fn test_from_pairs() {
        let table = from_pairs(16, [("a", 1), ("b", 2), ("c", 3)]).unwrap();

        assert_eq!(table.get("a"), Ok(Some(&1)));
        assert_eq!(table.get("b"), Ok(Some(&2)));
        assert_eq!(table.get("c"), Ok(Some(&3)));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_from_pairs_errors() {
        assert_eq!(from_pairs(0, [("a", 1)]).map(|t| t.len()), Err(TableError::ZeroCapacity));
        assert_eq!(from_pairs(4, [("a", 1), ("", 2)]).map(|t| t.len()), Err(TableError::EmptyKey));
    }

    #[test]
    fn test_keys_and_values() {
        let table = from_pairs(2, [("a", 1), ("b", 2), ("c", 3)]).unwrap();

        let mut keys = table.stored_keys();
        keys.sort();

        let mut values = table.values();
        values.sort_unstable();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_sync_table_entries() {
        let table = SyncTable::from(from_pairs(4, [("x", 'x'), ("y", 'y')]).unwrap());

        let mut entries = table.entries();
        entries.sort_unstable();
        assert_eq!(entries, vec![("x".to_string(), 'x'), ("y".to_string(), 'y')]);
        assert_eq!(table.stored_keys().len(), 2);
        assert_eq!(table.values().len(), 2);
    }
}
