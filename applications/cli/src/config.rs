//! Configuration loading.

use anyhow::{Context, Result};
use regex::Regex;
use retag_core::RetagError;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// User configuration, read from `retag.toml` in the platform config
/// directory with `RETAG_`-prefixed environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetagConfig {
    /// Fields deleted from every song that carries them
    #[serde(default)]
    pub tags_to_delete: Vec<String>,

    /// Regexes; a field whose every value matches one of these is deleted
    #[serde(default)]
    pub delete_value_patterns: Vec<String>,
}

impl RetagConfig {
    /// Load the configuration, tolerating a missing file.
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = Self::config_file() {
            if path.exists() {
                debug!("loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path));
            }
        }
        builder = builder.add_source(config::Environment::with_prefix("RETAG"));

        let settings = builder.build().context("Failed to load configuration")?;
        let config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("retag.toml"))
    }

    fn validate(&self) -> retag_core::Result<()> {
        self.deny_patterns().map(|_| ())
    }

    /// Compile the configured deny patterns
    pub fn deny_patterns(&self) -> retag_core::Result<Vec<Regex>> {
        self.delete_value_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| {
                    RetagError::config(format!(
                        "invalid delete_value_patterns entry {pattern:?}: {err}"
                    ))
                })
            })
            .collect()
    }
}
