//! Error type shared by the table and its clients

use thiserror::Error;

/// Failures reported by [`DoubleHashTable`](crate::DoubleHashTable) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The key was empty, so it has no probe sequence
    #[error("key must not be empty")]
    InvalidKey,
    /// No live entry exists for the key
    #[error("key `{0}` not found")]
    NotFound(String),
    /// Every bin was probed without finding a target.
    ///
    /// Needs every bin to hold a live entry for some other key, which the load-factor
    /// bound rules out.
    #[error("probe sequence exhausted all {capacity} bins")]
    ProbeExhausted {
        /// Capacity of the table at the time of the failed probe
        capacity: usize,
    },
}
