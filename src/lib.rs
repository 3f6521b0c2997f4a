//! # Prime Probe
//!
//! A string-keyed hash table built on open addressing with double hashing and lazy
//! deletion.
//!
//! `DoubleHashTable` derives the start bin of a key from a polynomial string hash and the
//! probe step from the same hash taken modulo the largest prime below the capacity, forced
//! odd so that every probe sequence covers the whole power-of-two table. Removed entries
//! leave tombstones behind; the table doubles as soon as half of its bins are live, which
//! also clears the tombstones.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primeprobe::{DoubleHashTable, TableError};
//!
//! // Create a new table with the default capacity of 8 bins
//! let mut table = DoubleHashTable::new();
//!
//! // Insert values
//! table.insert("apple", 1)?;
//! table.insert("banana", 2)?;
//!
//! // Retrieve values
//! assert_eq!(table.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(table.insert("apple", 10)?, Some(1));
//! assert_eq!(table.get("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(table.remove("apple")?, 10);
//! assert_eq!(table.get("apple"), None);
//! assert_eq!(table.remove("apple"), Err(TableError::NotFound("apple".to_string())));
//!
//! // Empty keys have no probe sequence
//! assert_eq!(table.insert("", 3), Err(TableError::InvalidKey));
//! # Ok::<(), TableError>(())
//! ```
//!
//! ## Word Frequency
//!
//! ```rust
//! use primeprobe::{frequency, word_frequency};
//!
//! let table = word_frequency("catdog", ["cat", "dog", "catdog"])?;
//!
//! assert_eq!(frequency(&table, "catdog"), 1);
//! assert_eq!(frequency(&table, "cat"), 0);
//! # Ok::<(), primeprobe::TableError>(())
//! ```

/// Module implementing the double-hashing table
mod double_hash_table;
/// Error type of table operations
mod error;
/// Prime table backing the probe step
mod primes;
/// Utility functions and traits for the table
mod utils;
/// Word tally built on the table
mod word_frequency;

pub use double_hash_table::{
    DEFAULT_CAPACITY, DoubleHashTable, Entry, Iter, MIN_CAPACITY, ProbeSequence,
};
pub use error::TableError;
pub use utils::{TableExtensions, from_pairs};
pub use word_frequency::{frequency, word_frequency, word_frequency_into};
