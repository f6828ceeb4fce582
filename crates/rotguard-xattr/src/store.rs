//! Reading and writing integrity records.

use tracing::{debug, trace};

use rotguard_core::{Algorithm, AttributeRecord, DEFAULT_NAMESPACE, MAX_DIGEST_HEX_LEN};

use crate::attributes::AttributeIo;
use crate::error::StoreError;
use crate::timestamp::{format_timestamp, parse_timestamp};

/// Suffix of the timestamp attribute, shared by every algorithm.
pub const TIMESTAMP_SUFFIX: &str = "ts";

/// Longest timestamp value accepted when reading.
///
/// `u64::MAX` seconds with a ten digit fraction is 31 bytes.
pub const MAX_TIMESTAMP_LEN: usize = 31;

/// Persists [`AttributeRecord`]s as extended attributes under a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XattrStore {
    namespace: String,
}

impl XattrStore {
    /// Create a store using `namespace` as the attribute prefix.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Name of the digest attribute for `algorithm`.
    pub fn digest_attr(&self, algorithm: Algorithm) -> String {
        format!("{}.{}", self.namespace, algorithm)
    }

    /// Name of the timestamp attribute.
    pub fn timestamp_attr(&self) -> String {
        format!("{}.{}", self.namespace, TIMESTAMP_SUFFIX)
    }

    /// Reset `record` to the unset sentinels, keeping its algorithm.
    pub fn clear(record: &mut AttributeRecord) {
        record.clear();
    }

    /// Fixed-width display form of `record`.
    pub fn format(record: &AttributeRecord) -> String {
        record.format()
    }

    /// Load the stored record for `record.algorithm` into `record`.
    ///
    /// Missing attributes are not an error: the record is left cleared. A
    /// digest without its timestamp is discarded, since it cannot be
    /// checked against the file's mtime.
    pub fn read<F>(&self, file: &F, record: &mut AttributeRecord) -> Result<(), StoreError>
    where
        F: AttributeIo + ?Sized,
    {
        record.clear();

        let digest_name = self.digest_attr(record.algorithm);
        let Some(digest) = self.fetch(file, &digest_name, MAX_DIGEST_HEX_LEN)? else {
            trace!(attr = %digest_name, "no stored digest");
            return Ok(());
        };

        let ts_name = self.timestamp_attr();
        let Some(ts) = self.fetch(file, &ts_name, MAX_TIMESTAMP_LEN)? else {
            debug!(attr = %digest_name, "stored digest has no timestamp, ignoring it");
            record.clear();
            return Ok(());
        };

        let mtime = parse_timestamp(&ts)?;
        record.digest_hex = String::from_utf8_lossy(&digest).into_owned();
        record.mtime = mtime;
        Ok(())
    }

    /// Load the stored record for `algorithm`.
    pub fn load<F>(&self, file: &F, algorithm: Algorithm) -> Result<AttributeRecord, StoreError>
    where
        F: AttributeIo + ?Sized,
    {
        let mut record = AttributeRecord::new(algorithm);
        self.read(file, &mut record)?;
        Ok(record)
    }

    /// Persist `record`: the digest first, then the timestamp.
    pub fn write<F>(&self, file: &F, record: &AttributeRecord) -> Result<(), StoreError>
    where
        F: AttributeIo + ?Sized,
    {
        let digest_name = self.digest_attr(record.algorithm);
        file.set_attr(&digest_name, record.digest_hex.as_bytes())
            .map_err(|source| StoreError::Write {
                name: digest_name,
                source,
            })?;

        let ts_name = self.timestamp_attr();
        file.set_attr(&ts_name, format_timestamp(record.mtime).as_bytes())
            .map_err(|source| StoreError::Write {
                name: ts_name,
                source,
            })
    }

    /// Delete the digest attribute for `algorithm` and the timestamp.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove<F>(&self, file: &F, algorithm: Algorithm) -> Result<bool, StoreError>
    where
        F: AttributeIo + ?Sized,
    {
        let mut removed = false;
        for name in [self.digest_attr(algorithm), self.timestamp_attr()] {
            match file.remove_attr(&name) {
                Ok(existed) => removed |= existed,
                Err(source) => return Err(StoreError::Remove { name, source }),
            }
        }
        Ok(removed)
    }

    fn fetch<F>(&self, file: &F, name: &str, max: usize) -> Result<Option<Vec<u8>>, StoreError>
    where
        F: AttributeIo + ?Sized,
    {
        let value = file.get_attr(name).map_err(|source| StoreError::Read {
            name: name.to_string(),
            source,
        })?;

        match value {
            Some(v) if v.len() > max => Err(StoreError::ValueTooLong {
                name: name.to_string(),
                len: v.len(),
                max,
            }),
            other => Ok(other),
        }
    }
}

impl Default for XattrStore {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
