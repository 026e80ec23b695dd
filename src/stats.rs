//! Placement statistics for a [`Table`]

use crate::{hash::tentative_index, table::Table};

/// How the stored keys of a table ended up where they are
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Number of buckets
    pub capacity: usize,
    /// Number of stored keys
    pub len: usize,
    /// Keys sitting in the bucket they hash to
    pub home: usize,
    /// Keys moved to another bucket by probing
    pub probed: usize,
    /// Keys stored in overflow chains
    pub chained: usize,
    /// Buckets with at least one chain node
    pub chained_buckets: usize,
    /// Length of the longest chain, excluding its root bucket
    pub longest_chain: usize,
}

impl<V> Table<V> {
    /// Tallies where each stored key lives.
    ///
    /// Walks the whole bucket array and re-hashes every key held in it.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats { capacity: self.capacity(), len: self.len(), ..TableStats::default() };

        for (index, bucket) in self.buckets.iter().enumerate() {
            if let Some(entry) = &bucket.entry {
                if tentative_index(&entry.key, self.bucket_count) == Ok(index) {
                    stats.home = stats.home.saturating_add(1);
                } else {
                    stats.probed = stats.probed.saturating_add(1);
                }
            }

            let mut length = 0_usize;
            let mut next = bucket.next;
            while let Some(node) = next {
                length = length.saturating_add(1);
                next = self.chains.get(node).and_then(|slot| slot.next);
            }
            if length > 0 {
                stats.chained_buckets = stats.chained_buckets.saturating_add(1);
                stats.longest_chain = stats.longest_chain.max(length);
            }
        }

        stats.chained = self.chains.iter().filter(|slot| slot.entry.is_some()).count();
        stats
    }
}

impl TableStats {
    /// Share of stored keys in their home bucket, in percent
    #[must_use]
    pub fn home_percent(&self) -> f64 {
        percent(self.home, self.len)
    }

    /// Share of stored keys placed by probing, in percent
    #[must_use]
    pub fn probed_percent(&self) -> f64 {
        percent(self.probed, self.len)
    }

    /// Share of stored keys living in chains, in percent
    #[must_use]
    pub fn chained_percent(&self) -> f64 {
        percent(self.chained, self.len)
    }
}

/// `part` of `whole` in percent, 0 for an empty whole
#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 * 100.0 / whole as f64 }
}
