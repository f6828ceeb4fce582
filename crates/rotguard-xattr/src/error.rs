//! Error types for attribute storage.

use std::io;

use thiserror::Error;

/// Errors that can occur while reading or writing stored records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The attribute exists but could not be read.
    #[error("Error retrieving stored attribute {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The attribute could not be written.
    #[error("Error writing attribute {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The attribute could not be removed.
    #[error("Error removing attribute {name}: {source}")]
    Remove {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A stored value is longer than any value this tool writes.
    #[error("Stored attribute {name} is too long: {len} bytes (limit {max})")]
    ValueTooLong { name: String, len: usize, max: usize },

    /// The timestamp attribute does not match `<seconds>[.<fraction>]`.
    #[error("Failed to parse stored timestamp: {value:?}")]
    MalformedTimestamp { value: String },

    /// The timestamp's fractional part is a second or more.
    #[error("Invalid stored timestamp (ns too large): {value}")]
    NanosOutOfRange { value: String },
}

impl StoreError {
    /// Whether the caller can reasonably skip this file and carry on.
    ///
    /// Failed writes and removals leave the file's existing tag intact.
    /// Everything else means the stored metadata itself is unreadable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Remove { .. })
    }
}
