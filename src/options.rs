//! Transformer options.
//!
//! Field names follow the camelCase keys hosts already use in their build
//! configs, so an options table can be deserialized as-is:
//!
//! ```toml
//! prefix = "un-"
//! prefixedOnly = false
//! nonValuedAttribute = true
//! ignoreAttributes = ["placeholder", "setup", "lang", "scoped"]
//! deleteClass = false
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_PREFIX: &str = "un-";

pub const DEFAULT_IGNORE_ATTRIBUTES: &[&str] = &["placeholder", "setup", "lang", "scoped"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Attribute prefix removed from names when `prefixed_only` is set.
    pub prefix: String,

    /// Strip `prefix` from attribute names before classification.
    pub prefixed_only: bool,

    /// Treat bare attributes (`<div mt-2>`) as utility candidates.
    pub non_valued_attribute: bool,

    /// Attribute names never turned into utilities.
    pub ignore_attributes: Vec<String>,

    /// Remove attributes whose utilities were moved into `class`.
    pub delete_class: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            prefixed_only: false,
            non_valued_attribute: true,
            ignore_attributes: DEFAULT_IGNORE_ATTRIBUTES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            delete_class: false,
        }
    }
}

impl Options {
    pub fn from_toml_str(src: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    /// Load options from a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn is_ignored(&self, name: &str) -> bool {
        self.ignore_attributes.iter().any(|a| a == name)
    }
}
