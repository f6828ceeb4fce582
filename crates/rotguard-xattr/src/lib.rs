//! Extended attribute storage for rotguard.
//!
//! Each tagged file carries two attributes:
//!
//! - `<namespace>.<algorithm>`: the hex digest, without a trailing NUL
//! - `<namespace>.ts`: the modification time the digest was taken at, as
//!   `<seconds>.<nanoseconds>`
//!
//! Timestamps are always written with nine fractional digits, but readers
//! accept anything from one to ten so that tags written by older tools with
//! microsecond precision keep working.
//!
//! ```rust,no_run
//! use std::fs::File;
//! use rotguard_xattr::{Algorithm, XattrStore};
//!
//! let file = File::open("/path/to/file").unwrap();
//! let store = XattrStore::default();
//! let record = store.load(&file, Algorithm::Sha256).unwrap();
//! println!("{}", XattrStore::format(&record));
//! ```

mod attributes;
mod error;
mod store;
mod timestamp;

pub use attributes::AttributeIo;
pub use error::StoreError;
pub use store::{MAX_TIMESTAMP_LEN, TIMESTAMP_SUFFIX, XattrStore};
pub use timestamp::{format_timestamp, parse_timestamp};

// Re-export core types for convenience
pub use rotguard_core::{Algorithm, AttributeRecord, DEFAULT_NAMESPACE, Mtime};
