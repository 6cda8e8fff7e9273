//! Optional TOML configuration.
//!
//! ```toml
//! [rates]
//! super_guarantee_rate = "0.105"
//! default_tax_rate = "0.35"
//!
//! [rates.visa]
//! working = "0.35"
//! skilled = "0.20"
//!
//! [logging]
//! level = "debug"
//! file = "estimator.log"
//! ```
//!
//! Every key is optional; anything left out keeps its default. Unknown keys
//! are rejected so a misspelling is not silently ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use super_core::{EstimatorConfig, EstimatorConfigError, SuperEstimator};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rates: {0}")]
    Rates(#[from] EstimatorConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `super_core=debug`.
    pub level: Option<String>,

    /// Append log records to this file as well as stderr.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub rates: EstimatorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parses and validates config text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.rates.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn estimator(&self) -> Result<SuperEstimator, ConfigError> {
        Ok(SuperEstimator::new(self.rates.clone())?)
    }
}
