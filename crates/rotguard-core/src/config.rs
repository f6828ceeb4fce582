//! Verification configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// Attribute namespace shared with other shatag-compatible tools.
pub const DEFAULT_NAMESPACE: &str = "user.shatag";

/// Configuration for a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct VerifyConfig {
    /// Hash algorithm; also selects the digest attribute name.
    #[builder(default)]
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Extended attribute namespace prefix.
    #[builder(default = "DEFAULT_NAMESPACE.to_string()")]
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Classify only; never write attributes.
    #[builder(default = "false")]
    #[serde(default)]
    pub dry_run: bool,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl VerifyConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref namespace) = self.namespace {
            if namespace.is_empty() {
                return Err("Attribute namespace cannot be empty".to_string());
            }
            if namespace.contains('\0') {
                return Err("Attribute namespace cannot contain NUL".to_string());
            }
            if namespace.ends_with('.') {
                return Err("Attribute namespace cannot end with '.'".to_string());
            }
        }
        Ok(())
    }
}

impl VerifyConfig {
    /// Create a new config builder.
    pub fn builder() -> VerifyConfigBuilder {
        VerifyConfigBuilder::default()
    }

    /// Create a config for `algorithm` with every other option defaulted.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            namespace: default_namespace(),
            dry_run: false,
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}
