//! Bit rot detection for rotguard.
//!
//! For each file the [`Verifier`] compares the record stored in its extended
//! attributes against the file's current modification time and a fresh
//! digest of its content:
//!
//! - **new**: nothing stored yet; the record is written
//! - **ok**: mtime unchanged and digest matches; nothing is written
//! - **outdated**: mtime changed; the file was edited, so the record is
//!   refreshed
//! - **corrupt**: mtime unchanged but the digest differs; the stored record
//!   is left alone so the finding shows up again on the next run
//!
//! ```rust,no_run
//! use rotguard_verify::{Status, Verifier, VerifyConfig};
//!
//! let verifier = Verifier::new(VerifyConfig::default());
//! let verdict = verifier.verify_path("/path/to/file".as_ref()).unwrap();
//!
//! if verdict.status == Status::Corrupt {
//!     eprintln!("stored: {}", verdict.stored);
//!     eprintln!("actual: {}", verdict.actual);
//! }
//! ```

mod error;
mod status;
mod verifier;

pub use error::VerifyError;
pub use status::{Status, Verdict, classify};
pub use verifier::{Verifier, current_mtime};

// Re-export core types for convenience
pub use rotguard_core::{Algorithm, AttributeRecord, Mtime, VerifyConfig, VerifyConfigBuilder};
pub use rotguard_xattr::{AttributeIo, StoreError, XattrStore};
