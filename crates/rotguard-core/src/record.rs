//! The persisted integrity record.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// Nanoseconds in one second; every valid `Mtime::nanos` is below this.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A modification time split into whole seconds and nanoseconds.
///
/// `(0, 0)` is reserved to mean "no timestamp recorded".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Mtime {
    /// Seconds since the Unix epoch.
    pub secs: u64,
    /// Sub-second part, always below [`NANOS_PER_SEC`].
    pub nanos: u32,
}

impl Mtime {
    /// The "unset" timestamp.
    pub const UNSET: Mtime = Mtime { secs: 0, nanos: 0 };

    /// Create a timestamp. Returns `None` if `nanos` is out of range.
    pub fn new(secs: u64, nanos: u32) -> Option<Self> {
        (nanos < NANOS_PER_SEC).then_some(Self { secs, nanos })
    }

    /// Convert a `SystemTime`. Times before the epoch have no representation.
    pub fn from_system_time(time: SystemTime) -> Option<Self> {
        let since = time.duration_since(UNIX_EPOCH).ok()?;
        Some(Self {
            secs: since.as_secs(),
            nanos: since.subsec_nanos(),
        })
    }

    /// Whether this is the reserved "unset" value.
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl fmt::Display for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}.{:09}", self.secs, self.nanos)
    }
}

/// Digest and timestamp as stored in (or destined for) a file's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Algorithm that produced `digest_hex`.
    pub algorithm: Algorithm,
    /// Lowercase hex digest, or all `'0'` when unset.
    pub digest_hex: String,
    /// Modification time the digest was taken at.
    pub mtime: Mtime,
}

impl AttributeRecord {
    /// Create a cleared record for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            digest_hex: algorithm.zero_digest(),
            mtime: Mtime::UNSET,
        }
    }

    /// Create a record from known values.
    pub fn with_values(
        algorithm: Algorithm,
        digest_hex: impl Into<String>,
        mtime: Mtime,
    ) -> Self {
        Self {
            algorithm,
            digest_hex: digest_hex.into(),
            mtime,
        }
    }

    /// Reset the digest and timestamp to their sentinels. `algorithm` is kept.
    pub fn clear(&mut self) {
        self.mtime = Mtime::UNSET;
        self.digest_hex = self.algorithm.zero_digest();
    }

    /// A record with no timestamp counts as absent.
    pub fn is_unset(&self) -> bool {
        self.mtime.is_unset()
    }

    /// Whether the digest is the all-zero sentinel.
    pub fn has_zero_digest(&self) -> bool {
        self.digest_hex.len() == self.algorithm.hex_len()
            && self.digest_hex.bytes().all(|b| b == b'0')
    }

    /// Fixed-width display form: `<digest> <secs:010>.<nanos:09>`.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttributeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.digest_hex, self.mtime)
    }
}
