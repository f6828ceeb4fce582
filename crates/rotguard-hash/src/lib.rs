//! Content digests for rotguard.
//!
//! Files are streamed through the selected [`Algorithm`] in fixed-size
//! chunks and the result is returned as lowercase hex, ready to be stored
//! in an extended attribute.
//!
//! ```rust,no_run
//! use std::fs::File;
//! use rotguard_hash::{Algorithm, digest_file};
//!
//! let file = File::open("/path/to/file").unwrap();
//! let hex = digest_file(&file, Algorithm::Sha256).unwrap();
//! assert_eq!(hex.len(), Algorithm::Sha256.hex_len());
//! ```

mod digest;

pub use digest::{HashError, digest_bytes, digest_file, digest_reader, to_hex};

// Re-export core types for convenience
pub use rotguard_core::{Algorithm, ParseAlgorithmError};
