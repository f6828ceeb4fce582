//! Classification results.

use serde::{Deserialize, Serialize, Serializer};
use strum::Display;

use rotguard_core::AttributeRecord;
use rotguard_xattr::StoreError;

/// Integrity status of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// No record was stored.
    New,
    /// Content matches the stored digest.
    Ok,
    /// The file was modified since the record was stored.
    Outdated,
    /// Content changed without a modification time change.
    Corrupt,
}

impl Status {
    /// Whether the fresh record should replace the stored one.
    pub fn needs_write(self) -> bool {
        matches!(self, Status::New | Status::Outdated)
    }

    /// Whether this is a corruption finding.
    pub fn is_corrupt(self) -> bool {
        self == Status::Corrupt
    }
}

/// Outcome of verifying one file.
#[derive(Debug, Serialize)]
pub struct Verdict {
    /// Classification.
    pub status: Status,
    /// Record found in the file's attributes (cleared if none).
    pub stored: AttributeRecord,
    /// Record computed from the file as it is now.
    pub actual: AttributeRecord,
    /// Whether `actual` was written to the file's attributes.
    pub written: bool,
    /// Why `actual` could not be written, if the write was attempted and
    /// failed. The classification still stands.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_write_error"
    )]
    pub write_error: Option<StoreError>,
}

fn serialize_write_error<S: Serializer>(
    error: &Option<StoreError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.collect_str(e),
        None => serializer.serialize_none(),
    }
}

/// Decide the status of a file from its stored and freshly computed records.
///
/// `actual` must carry the mtime sampled before its digest was computed.
pub fn classify(stored: &AttributeRecord, actual: &AttributeRecord) -> Status {
    if stored.is_unset() {
        Status::New
    } else if stored.mtime != actual.mtime {
        Status::Outdated
    } else if stored.digest_hex == actual.digest_hex {
        Status::Ok
    } else {
        Status::Corrupt
    }
}
