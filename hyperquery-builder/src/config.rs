use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings of a [`crate::QueryEngine`]. Missing values fall back to their defaults.
#[derive(Default, Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Warn about documents without selections and caps. Defaults to `true`.
    pub warn_on_unconstrained: Option<bool>,
    /// Warn about `includeAllBlocks` without any selection. Defaults to `true`.
    pub warn_on_all_blocks_only: Option<bool>,
    /// Refuse to encode documents that have warnings. Defaults to `false`.
    pub deny_warnings: Option<bool>,
}

impl EngineConfig {
    /// Reads the config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&data).context("parse engine config")
    }
}
