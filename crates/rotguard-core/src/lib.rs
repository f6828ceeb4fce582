//! Core types for rotguard.
//!
//! This crate holds the data shared by the hashing, attribute and
//! verification crates: algorithm identifiers, the persisted
//! [`AttributeRecord`], and run configuration.

mod algorithm;
mod config;
mod error;
mod record;

pub use algorithm::{Algorithm, MAX_DIGEST_HEX_LEN, MAX_DIGEST_SIZE};
pub use config::{DEFAULT_NAMESPACE, VerifyConfig, VerifyConfigBuilder};
pub use error::ParseAlgorithmError;
pub use record::{AttributeRecord, Mtime, NANOS_PER_SEC};
