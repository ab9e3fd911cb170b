// File: src/config.rs
// Purpose: Validator configuration, optionally loaded from TOML

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default annotation key holding the rules
pub const DEFAULT_TAG: &str = "validate";

/// Default annotation key holding a field's alternate name
pub const DEFAULT_ALTERNATE_NAME_TAG: &str = "json";

/// Which annotations a validator reads
///
/// ```toml
/// tag = "validate"
/// alternate_name_tag = "json"
/// read_alternate_name = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Annotation key holding the rule tag
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Annotation key holding the alternate field name
    #[serde(default = "default_alternate_name_tag")]
    pub alternate_name_tag: String,

    /// Report failures under the alternate name when one is declared
    #[serde(default)]
    pub read_alternate_name: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            alternate_name_tag: default_alternate_name_tag(),
            read_alternate_name: false,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ValidatorConfig = toml::from_str(content).context("Invalid validator config")?;
        Ok(config)
    }
}

// Default values
fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_alternate_name_tag() -> String {
    DEFAULT_ALTERNATE_NAME_TAG.to_string()
}
