//! Error types for verification.

use std::io;

use thiserror::Error;

use rotguard_hash::HashError;
use rotguard_xattr::StoreError;

/// Errors that stop a single file from being classified.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The file could not be opened.
    #[error("Cannot open file: {source}")]
    Open {
        #[source]
        source: io::Error,
    },

    /// `fstat` failed.
    #[error("Cannot read file metadata: {source}")]
    Metadata {
        #[source]
        source: io::Error,
    },

    /// Only regular files carry integrity records.
    #[error("Not a regular file")]
    NotRegularFile,

    /// The modification time lies before the Unix epoch.
    #[error("Modification time precedes the Unix epoch")]
    UnsupportedMtime,

    /// Hashing the content failed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// Reading or writing the stored record failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VerifyError {
    /// Whether the stored record and file are in a sane state despite the
    /// error, so a caller may simply move on to the next file.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_recoverable(),
            _ => false,
        }
    }
}
