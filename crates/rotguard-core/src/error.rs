//! Error types shared across rotguard crates.

use thiserror::Error;

use crate::algorithm::Algorithm;

/// An algorithm name that no backend knows about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown hash algorithm '{name}' (supported: {supported})")]
pub struct ParseAlgorithmError {
    /// The name that failed to parse.
    pub name: String,
    supported: String,
}

impl ParseAlgorithmError {
    /// Create an error for an unrecognised name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported: Algorithm::supported_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_supported() {
        let err = ParseAlgorithmError::new("crc32");
        let message = err.to_string();
        assert!(message.contains("crc32"));
        assert!(message.contains("sha256"));
        assert!(message.contains("blake3"));
    }
}
