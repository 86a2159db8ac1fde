//! TOML configuration loading and validation.

use std::path::Path;

use serde::Deserialize;
use tiervault::ReallocParams;

use crate::error::{Error, Result};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: ReallocParams,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON from `run`.
    #[serde(default)]
    pub pretty: bool,
    /// Show whole-percent and basis-point columns in `plan`.
    #[serde(default = "default_true")]
    pub settlement: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            settlement: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    /// Warn when a tier's current allocations miss 100 by more than this.
    #[serde(default = "default_sum_tolerance")]
    pub allocation_sum_tolerance: f64,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            allocation_sum_tolerance: default_sum_tolerance(),
        }
    }
}

fn default_sum_tolerance() -> f64 {
    0.5
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        self.engine.validate().map_err(Error::Config)?;
        let tol = self.inspect.allocation_sum_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::Config(format!(
                "allocation_sum_tolerance must be >= 0 and finite, got {tol}"
            )));
        }
        Ok(())
    }
}
