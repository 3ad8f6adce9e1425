//! Serializable run configuration.

use ebbtide_core::StrategyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content-addressable identifier for a run.
pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("failed to parse config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("invalid strategy config: {0}")]
    Strategy(#[from] ebbtide_core::config::ConfigError),
    #[error("initial_quote must be >= 0, got {0}")]
    NegativeQuote(f64),
    #[error("initial_base must be >= 0, got {0}")]
    NegativeBase(f64),
}

/// Everything needed to reproduce a run: strategy parameters, starting
/// balances, and the expected candle spacing. Two runs with identical
/// configs share a [`RunId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub strategy: StrategyConfig,
    pub initial_quote: f64,
    pub initial_base: f64,
    /// Expected candle spacing; feeds with gaps at this interval are
    /// rejected. `None` skips the gap check.
    pub interval_ms: Option<i64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            initial_quote: 1_000_000.0,
            initial_base: 0.0,
            interval_ms: Some(240 * 60_000),
        }
    }
}

impl RunConfig {
    pub fn from_toml_path(path: &Path) -> Result<Self, RunConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| RunConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| RunConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RunConfigError> {
        self.strategy.validate()?;
        if self.initial_quote < 0.0 {
            return Err(RunConfigError::NegativeQuote(self.initial_quote));
        }
        if self.initial_base < 0.0 {
            return Err(RunConfigError::NegativeBase(self.initial_base));
        }
        Ok(())
    }

    /// Deterministic hash of the canonical JSON form. Identical configs
    /// hash identically, so artifacts can be looked up by id.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
