//! Utility functions and traits for `DoubleHashTable`

use crate::{DoubleHashTable, TableError};

/// Extension trait for tables that provides owned views of their contents
pub trait TableExtensions<V> {
    /// Returns the live keys of the table as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the live values of the table as a Vec
    fn values(&self) -> Vec<V>;
}

impl<V: Clone> TableExtensions<V> for DoubleHashTable<V> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Creates a `DoubleHashTable` from an iterator of key-value pairs
///
/// # Errors
///
/// Stops at the first pair the table rejects, see [`DoubleHashTable::insert`].
pub fn from_pairs<K, V, I>(iter: I) -> Result<DoubleHashTable<V>, TableError>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = DoubleHashTable::new();

    for (key, value) in iter {
        table.insert(key, value)?;
    }

    Ok(table)
}
