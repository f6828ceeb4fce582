//! Streaming digest computation.

use std::fs::File;
use std::io::{self, Read, Seek};

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_256};
use thiserror::Error;
use tracing::trace;

use rotguard_core::Algorithm;

/// Read buffer size used while streaming file content.
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors that can occur while hashing.
#[derive(Debug, Error)]
pub enum HashError {
    /// Reading the content failed part way through.
    #[error("Read error while hashing: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for HashError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

/// Incremental hasher dispatching on the selected algorithm.
enum Hasher {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha512_256(Sha512_256),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Sha224 => Self::Sha224(Sha224::new()),
            Algorithm::Sha256 => Self::Sha256(Sha256::new()),
            Algorithm::Sha384 => Self::Sha384(Sha384::new()),
            Algorithm::Sha512 => Self::Sha512(Sha512::new()),
            Algorithm::Sha512_256 => Self::Sha512_256(Sha512_256::new()),
            Algorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Sha512_256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Sha224(h) => to_hex(&h.finalize()),
            Self::Sha256(h) => to_hex(&h.finalize()),
            Self::Sha384(h) => to_hex(&h.finalize()),
            Self::Sha512(h) => to_hex(&h.finalize()),
            Self::Sha512_256(h) => to_hex(&h.finalize()),
            Self::Blake3(h) => to_hex(h.finalize().as_bytes()),
        }
    }
}

/// Lowercase hex encoding of `bytes`.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hash everything `reader` yields from its current position to EOF.
pub fn digest_reader<R: Read>(mut reader: R, algorithm: Algorithm) -> Result<String, HashError> {
    let mut hasher = Hasher::new(algorithm);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    trace!(%algorithm, bytes = total, "digest complete");
    Ok(hasher.finalize_hex())
}

/// Hash the whole content of an open file.
///
/// The file is rewound to offset 0 first, so a descriptor that has already
/// been read from still yields the digest of the full content.
pub fn digest_file(file: &File, algorithm: Algorithm) -> Result<String, HashError> {
    let mut handle = file;
    handle.rewind()?;
    digest_reader(handle, algorithm)
}

/// Hash an in-memory buffer.
pub fn digest_bytes(data: &[u8], algorithm: Algorithm) -> String {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize_hex()
}
