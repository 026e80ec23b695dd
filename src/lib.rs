//! # Quadchain
//!
//! A string-keyed hash table with a fixed bucket array, a byte-average hash function and a
//! two-tier collision strategy.
//!
//! This crate provides:
//!
//! - `Table`: the single-threaded table
//! - `SyncTable`: the same table behind one `RwLock`, for sharing between threads
//!
//! A key is placed in the bucket its hash points at when that bucket is free. Otherwise
//! up to five rounds of quadratic probing look for a free bucket nearby, and when those
//! run out the key is appended to an overflow chain hanging off its home bucket. The
//! bucket array never grows and nothing is ever removed, so a key keeps its location for
//! the lifetime of the table.
//!
//! ## Basic Usage
//!
//! ```rust
//! use quadchain::Table;
//!
//! // Create a table with 1024 buckets
//! let mut table = Table::with_capacity(1024)?;
//!
//! // Insert values
//! table.set("apple", 1)?;
//! table.set("banana", 2)?;
//!
//! // Retrieve values
//! assert_eq!(table.get("apple")?, Some(&1));
//! assert_eq!(table.get("cherry")?, None);
//!
//! // Update values
//! assert_eq!(table.set("apple", 10)?, Some(1));
//! assert_eq!(table.get("apple")?, Some(&10));
//! # Ok::<(), quadchain::TableError>(())
//! ```
//!
//! ## Inspecting Placement
//!
//! ```rust
//! use quadchain::{Location, Table};
//!
//! // With a single bucket, everything after the first key is chained
//! let mut table = Table::with_capacity(1)?;
//! table.set("first", ())?;
//! table.set("second", ())?;
//!
//! assert_eq!(table.locate("first")?, Some(Location::Bucket(0)));
//! assert_eq!(table.locate("second")?.map(|l| l.depth()), Some(1));
//! assert_eq!(table.stats().chained, 1);
//! # Ok::<(), quadchain::TableError>(())
//! ```
//!
//! ## Concurrent Usage
//!
//! ```rust
//! use quadchain::{SyncTable, TableConfig};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let table = Arc::new(SyncTable::with_config(TableConfig::default().with_bucket_count(4096))?);
//!
//! let writer = Arc::clone(&table);
//! let handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         writer.set(format!("key-{i}"), i).unwrap();
//!     }
//! });
//! handle.join().unwrap();
//!
//! assert_eq!(table.len(), 100);
//! assert_eq!(table.get("key-42")?, Some(42));
//! # Ok::<(), quadchain::TableError>(())
//! ```

/// Construction parameters and constants
pub mod config;
/// Error type
mod error;
/// The byte-average hash function
pub mod hash;
/// Collision resolution: probing and chaining
mod resolve;
/// Placement statistics
mod stats;
/// Table wrapped in a lock
mod sync_table;
/// The table itself
mod table;
/// Utility functions and traits for tables
mod utils;

pub use config::TableConfig;
pub use error::{Result, TableError};
pub use hash::KeyDigest;
pub use resolve::{Location, Probe, ProbeSequence};
pub use stats::TableStats;
pub use sync_table::SyncTable;
pub use table::{Iter, Table};
pub use utils::{TableExtensions, from_pairs};
