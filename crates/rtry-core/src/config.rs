use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::retry::{Backoff, Policy};

/// Backoff growth shape selected in config.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Fixed,
    Linear,
    #[default]
    Exponential,
}

/// Invalid values in an otherwise well-formed config file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("growth_factor must be a finite number >= 0 (got {0})")]
    InvalidGrowthFactor(f64),
}

/// Global configuration loaded from `~/.config/rtry/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtryConfig {
    /// Backoff shape: "fixed", "linear" or "exponential".
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Wait before the first retry, in milliseconds.
    pub initial_wait_ms: u64,
    /// Growth factor for linear/exponential backoff (ignored for fixed).
    pub growth_factor: f64,
    /// Retryable failures tolerated before giving up (None = unbounded).
    #[serde(default)]
    pub max_attempts: Option<u64>,
    /// Cap on a single wait in milliseconds (None = uncapped).
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
    /// Deadline for a whole retry session in seconds (None = no deadline).
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for RtryConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Exponential,
            initial_wait_ms: 100,
            growth_factor: 1.0,
            max_attempts: Some(5),
            max_wait_ms: Some(30_000),
            deadline_secs: None,
        }
    }
}

impl RtryConfig {
    /// Build the retry policy described by this config.
    pub fn policy(&self) -> Result<Policy, ConfigError> {
        if !self.growth_factor.is_finite() || self.growth_factor < 0.0 {
            return Err(ConfigError::InvalidGrowthFactor(self.growth_factor));
        }
        let initial_wait = Duration::from_millis(self.initial_wait_ms);
        let backoff = match self.strategy {
            StrategyKind::Fixed => Backoff::Fixed { wait: initial_wait },
            StrategyKind::Linear => Backoff::Linear {
                initial_wait,
                growth_factor: self.growth_factor,
            },
            StrategyKind::Exponential => Backoff::Exponential {
                initial_wait,
                growth_factor: self.growth_factor,
            },
        };
        Ok(Policy {
            backoff,
            max_attempts: self.max_attempts,
            max_wait: self.max_wait_ms.map(Duration::from_millis),
        })
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rtry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RtryConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RtryConfig::default();
        write_to(&path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RtryConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: RtryConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}

fn write_to(path: &Path, cfg: &RtryConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}
