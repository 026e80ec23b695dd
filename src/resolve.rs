//! Turning a tentative index into the slot a key is committed to.
//!
//! A key lands in its home bucket when that bucket is free or already holds it. Otherwise
//! up to [`ROUND_LIMIT`] rounds of quadratic probing look for another free or matching
//! bucket, and after that the key goes into the overflow chain of its home bucket.
//!
//! Probe offsets are applied to a running cursor: round `i` first moves it by `+i²` and
//! then by `-i²`. Candidates outside the bucket array are skipped, never wrapped. `set`
//! and `get` both follow this exact path, which is what lets `get` find a key again.

use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::{
    config::ROUND_LIMIT,
    table::{Slot, Table},
};

/// Where a key is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// A slot of the bucket array
    Bucket(usize),
    /// A node of the overflow chain rooted at `bucket`; `depth` 1 is the first node after
    /// the root
    Chained {
        /// Root bucket of the chain
        bucket: usize,
        /// Position within the chain
        depth: NonZeroUsize,
    },
}

impl Location {
    /// The bucket that owns this location
    #[must_use]
    pub fn bucket(&self) -> usize {
        match *self {
            Self::Bucket(bucket) | Self::Chained { bucket, .. } => bucket,
        }
    }

    /// Position within the chain, 0 for the bucket itself
    #[must_use]
    pub fn depth(&self) -> usize {
        match *self {
            Self::Bucket(_) => 0,
            Self::Chained { depth, .. } => depth.get(),
        }
    }
}

/// Handle on a physical slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotRef {
    /// Index into the bucket array
    Bucket(usize),
    /// Index into the chain node arena
    Node(usize),
}

/// Outcome of walking the resolution path for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// A slot that is free or already holds the key
    Settled {
        /// Logical position of the slot
        location: Location,
        /// Physical slot
        slot: SlotRef,
    },
    /// Every candidate is taken by other keys; a new chain node belongs after `tail`
    Exhausted {
        /// Location the new node will have
        location: Location,
        /// Last slot of the chain, possibly the root bucket
        tail: SlotRef,
    },
}

/// One candidate produced by [`ProbeSequence`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Probing round, starting at 1
    pub round: u32,
    /// Candidate bucket, `None` when the cursor left the bucket array
    pub index: Option<usize>,
}

/// The bounded, cumulative quadratic probe sequence starting at a tentative index.
///
/// Yields two candidates per round for rounds `1..=ROUND_LIMIT`.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Running position, signed so that it can step below zero
    cursor: i128,
    /// Number of buckets; candidates at or above it are out of range
    bucket_count: i128,
    /// Current round
    round: u32,
    /// Whether the next step is the `+i²` half of the round
    forward: bool,
}

impl ProbeSequence {
    /// Starts probing from `tentative` in a table of `bucket_count` buckets
    #[must_use]
    pub fn new(tentative: usize, bucket_count: NonZeroUsize) -> Self {
        Self {
            cursor: i128::from(tentative as u64),
            bucket_count: i128::from(bucket_count.get() as u64),
            round: 1,
            forward: true,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = Probe;

    fn next(&mut self) -> Option<Self::Item> {
        if self.round > ROUND_LIMIT {
            return None;
        }

        let step = i128::from(self.round).wrapping_pow(2);
        let round = self.round;
        if self.forward {
            self.cursor = self.cursor.wrapping_add(step);
        } else {
            self.cursor = self.cursor.wrapping_sub(step);
            self.round = self.round.saturating_add(1);
        }
        self.forward = !self.forward;

        let index = if (0..self.bucket_count).contains(&self.cursor) {
            usize::try_from(self.cursor).ok()
        } else {
            None
        };

        Some(Probe { round, index })
    }
}

impl<V> Table<V> {
    /// Walks the resolution path of `key` from its tentative index without modifying
    /// anything.
    pub(crate) fn resolve(&self, tentative: usize, key: &str) -> Resolution {
        if self.bucket(tentative).accepts(key) {
            return Resolution::Settled {
                location: Location::Bucket(tentative),
                slot: SlotRef::Bucket(tentative),
            };
        }

        for probe in ProbeSequence::new(tentative, self.bucket_count) {
            let Some(index) = probe.index else {
                continue;
            };
            if self.bucket(index).accepts(key) {
                trace!(tentative, index, round = probe.round, "Probe hit.");
                return Resolution::Settled {
                    location: Location::Bucket(index),
                    slot: SlotRef::Bucket(index),
                };
            }
        }

        self.walk_chain(tentative, key)
    }

    /// Searches the overflow chain of `bucket` for `key`, reporting its tail when absent.
    fn walk_chain(&self, bucket: usize, key: &str) -> Resolution {
        let mut tail = SlotRef::Bucket(bucket);
        let mut next = self.bucket(bucket).next;
        let mut depth = NonZeroUsize::MIN;

        while let Some(node) = next {
            let location = Location::Chained { bucket, depth };
            let slot = self.node(node, location);
            if slot.accepts(key) {
                return Resolution::Settled { location, slot: SlotRef::Node(node) };
            }

            tail = SlotRef::Node(node);
            next = slot.next;
            depth = depth.saturating_add(1);
        }

        Resolution::Exhausted { location: Location::Chained { bucket, depth }, tail }
    }

    /// Links a fresh, empty node after `tail` and returns it.
    pub(crate) fn append_node(&mut self, location: Location, tail: SlotRef) -> SlotRef {
        let node = self.chains.len();
        self.chains.push(Slot::default());
        self.slot_mut(tail, location).next = Some(node);

        debug!(
            bucket = location.bucket(),
            depth = location.depth(),
            "Probing exhausted, chained new node."
        );

        SlotRef::Node(node)
    }
}
