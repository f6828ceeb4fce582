//! Per-file verification.

use std::fs::File;
use std::path::Path;

use tracing::{debug, info, warn};

use rotguard_core::{AttributeRecord, Mtime, VerifyConfig};
use rotguard_hash::digest_file;
use rotguard_xattr::{AttributeIo, XattrStore};

use crate::error::VerifyError;
use crate::status::{Status, Verdict, classify};

/// Current modification time of `file`.
///
/// Fails with [`VerifyError::NotRegularFile`] for directories, devices and
/// other special files.
pub fn current_mtime(file: &File) -> Result<Mtime, VerifyError> {
    let metadata = file
        .metadata()
        .map_err(|source| VerifyError::Metadata { source })?;

    if !metadata.is_file() {
        return Err(VerifyError::NotRegularFile);
    }

    let modified = metadata
        .modified()
        .map_err(|source| VerifyError::Metadata { source })?;
    Mtime::from_system_time(modified).ok_or(VerifyError::UnsupportedMtime)
}

/// Checks files against their stored integrity records.
///
/// A verifier holds only immutable configuration, so one instance can be
/// shared across threads as long as each call gets its own file.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifyConfig,
    store: XattrStore,
}

impl Verifier {
    /// Create a verifier for `config`.
    pub fn new(config: VerifyConfig) -> Self {
        let store = XattrStore::new(config.namespace.clone());
        Self { config, store }
    }

    /// Open `path` read-only and verify it.
    pub fn verify_path(&self, path: &Path) -> Result<Verdict, VerifyError> {
        let file = File::open(path).map_err(|source| VerifyError::Open { source })?;
        self.verify(&file)
    }

    /// Classify `file` and refresh its stored record when warranted.
    pub fn verify(&self, file: &File) -> Result<Verdict, VerifyError> {
        self.verify_with(file, file)
    }

    /// Classify `file`, reading and writing its record through `attrs`.
    ///
    /// A failed write does not discard the classification: the verdict is
    /// returned with `written == false` and the error in `write_error`.
    pub fn verify_with<A>(&self, file: &File, attrs: &A) -> Result<Verdict, VerifyError>
    where
        A: AttributeIo + ?Sized,
    {
        let algorithm = self.config.algorithm;

        // The mtime is sampled before hashing: if the file is being written
        // concurrently, the recorded time is never newer than the content.
        let mut actual = AttributeRecord::new(algorithm);
        actual.mtime = current_mtime(file)?;

        let stored = self.store.load(attrs, algorithm)?;
        self.compute(file, &mut actual)?;

        let status = classify(&stored, &actual);
        debug!(%status, stored = %stored, actual = %actual, "classified");

        let mut written = false;
        let mut write_error = None;
        if status.needs_write() && !self.config.dry_run {
            match self.store.write(attrs, &actual) {
                Ok(()) => {
                    info!(%status, record = %actual, "stored record updated");
                    written = true;
                }
                Err(e) => {
                    warn!(%status, error = %e, "could not update stored record");
                    write_error = Some(e);
                }
            }
        }

        if status == Status::Corrupt {
            warn!(stored = %stored, actual = %actual, "content changed without mtime change");
        }

        Ok(Verdict {
            status,
            stored,
            actual,
            written,
            write_error,
        })
    }

    /// Fill `record` from the file's current state.
    ///
    /// The digest is always recomputed. The mtime is only sampled when
    /// `record` does not already carry one, so a caller that sampled it
    /// earlier keeps that (older) value.
    pub fn compute(&self, file: &File, record: &mut AttributeRecord) -> Result<(), VerifyError> {
        if record.mtime.is_unset() {
            record.mtime = current_mtime(file)?;
        }
        record.digest_hex = digest_file(file, record.algorithm)?;
        Ok(())
    }

    /// Strip this verifier's stored attributes from the file at `path`.
    ///
    /// Returns `true` if anything was removed. Honors `dry_run` by only
    /// reporting whether a record is present.
    pub fn remove_path(&self, path: &Path) -> Result<bool, VerifyError> {
        let file = File::open(path).map_err(|source| VerifyError::Open { source })?;
        current_mtime(&file)?;

        if self.config.dry_run {
            let stored = self.store.load(&file, self.config.algorithm)?;
            return Ok(!stored.is_unset());
        }

        let removed = self.store.remove(&file, self.config.algorithm)?;
        if removed {
            info!(path = %path.display(), "stored record removed");
        }
        Ok(removed)
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(VerifyConfig::default())
    }
}
