//! Pipeline configuration.
//!
//! The configuration can be read from a TOML file:
//!
//! ```toml
//! input = "vectors.bin"
//! output = "data.csv"
//! word_limit = 1250
//!
//! [tsne]
//! perplexity = 5.0
//! learning_rate = 300.0
//! iterations = 1500
//! ```
//!
//! Fields that are absent use their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::projection::Tsne;

/// Configuration of the word2vec to CSV pipeline.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// word2vec binary input file.
    pub input: Option<PathBuf>,

    /// CSV output file.
    pub output: Option<PathBuf>,

    /// Maximum number of records to read, `0` reads all records.
    pub word_limit: usize,

    /// Replace invalid UTF-8 in tokens rather than failing.
    ///
    /// word2vec truncates long words at a byte boundary, so tokens
    /// with broken multi-byte sequences are common.
    pub lossy: bool,

    pub tsne: TsneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: None,
            output: None,
            word_limit: 1250,
            lossy: true,
            tsne: TsneConfig::default(),
        }
    }
}

impl Config {
    /// Read the configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            Error::read_error(
                format!("Cannot read configuration file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&data)
    }

    /// Parse the configuration from a TOML string.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data)
            .map_err(|e| Error::Config(format!("Cannot deserialize TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration values are usable.
    pub fn validate(&self) -> Result<()> {
        self.tsne.to_tsne()?;

        if self.tsne.progress_interval == 0 {
            return Err(Error::Config(
                "progress interval should be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// t-SNE hyperparameters.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TsneConfig {
    pub perplexity: f32,
    pub learning_rate: f32,
    pub iterations: usize,

    /// Seed for the initial layout, `0` when absent.
    pub seed: Option<u64>,

    /// Report the divergence every `progress_interval` iterations.
    pub progress_interval: usize,
}

impl Default for TsneConfig {
    fn default() -> Self {
        TsneConfig {
            perplexity: 5.0,
            learning_rate: 300.0,
            iterations: 1500,
            seed: None,
            progress_interval: 10,
        }
    }
}

impl TsneConfig {
    /// Construct the projection described by this configuration.
    pub fn to_tsne(&self) -> Result<Tsne> {
        Ok(Tsne::new(self.perplexity, self.learning_rate, self.iterations)?
            .with_seed(self.seed.unwrap_or(0)))
    }
}
