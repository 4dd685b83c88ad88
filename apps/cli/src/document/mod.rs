//! Document loading and private-key access.
//!
//! A document is an insertion-ordered `serde_json::Value` tree loaded from a
//! YAML source. Keys starting with `_` are private: build configuration and
//! author bookkeeping that must never reach a public artifact (`redact`
//! strips them at every depth).

pub mod catalog;
pub mod merge;
pub mod redact;

use std::path::Path;

use serde_json::Value;

use crate::errors::BuildError;

/// Reserved prefix marking private keys.
pub const PRIVATE_PREFIX: char = '_';

/// Loads a YAML document from `path`, preserving key order.
pub fn load(path: &Path) -> Result<Value, BuildError> {
    if !path.exists() {
        return Err(BuildError::input_not_found(path));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Reads a private top-level string key (e.g. `_theme`, `_domain`).
pub fn private_str<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}
