//! Hash algorithm identifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::ParseAlgorithmError;

/// Largest digest any supported algorithm produces, in bytes.
pub const MAX_DIGEST_SIZE: usize = 64;

/// Longest hex digest that will ever be read back from an attribute.
pub const MAX_DIGEST_HEX_LEN: usize = MAX_DIGEST_SIZE * 2;

/// A content hash algorithm.
///
/// The display name doubles as the attribute suffix, so `Sha256` is stored
/// under `<namespace>.sha256`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[strum(to_string = "sha224")]
    Sha224,
    #[default]
    #[strum(to_string = "sha256")]
    Sha256,
    #[strum(to_string = "sha384")]
    Sha384,
    #[strum(to_string = "sha512")]
    Sha512,
    #[strum(to_string = "sha512-256")]
    #[serde(rename = "sha512-256")]
    Sha512_256,
    #[strum(to_string = "blake3")]
    Blake3,
}

impl Algorithm {
    /// Look up an algorithm by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, ParseAlgorithmError> {
        let wanted = name.trim();
        Self::iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseAlgorithmError::new(name))
    }

    /// Every supported algorithm.
    pub fn all() -> impl Iterator<Item = Algorithm> {
        Self::iter()
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Native digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Algorithm::Sha224 => 28,
            Algorithm::Sha256 | Algorithm::Sha512_256 | Algorithm::Blake3 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }

    /// Length of the hex encoding of a digest.
    pub fn hex_len(self) -> usize {
        self.digest_size() * 2
    }

    /// The "unset" digest: all ASCII `'0'`, sized for this algorithm.
    pub fn zero_digest(self) -> String {
        "0".repeat(self.hex_len())
    }

    /// Comma-separated list of every supported name, for help and errors.
    pub fn supported_names() -> String {
        Self::iter().map(Algorithm::name).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
