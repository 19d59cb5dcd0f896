//! Layered configuration: TOML file, then `LETHE_*` environment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

use crate::forgetting::ForgettingControlConfig;
use crate::recovery::RecoveryConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetheConfig {
    pub telemetry: TelemetryConfig,
    pub forgetting: ForgettingControlConfig,
    pub recovery: RecoveryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Parsed `log_level`, falling back to `INFO` on unknown names.
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

impl LetheConfig {
    /// Load from a TOML file if it exists, otherwise defaults; then apply
    /// environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            Self::from_toml(&contents)?
        } else {
            info!("no config file at {}, using defaults", path.display());
            LetheConfig::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config TOML")
    }

    /// Apply `LETHE_LOG_LEVEL`, `LETHE_LOG_JSON`, `LETHE_RECOVERY_TIMEOUT_MS`,
    /// `LETHE_MAX_RECOVERY_ATTEMPTS` and `LETHE_AUTO_EXECUTE` as returned by
    /// `lookup`. Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LETHE_LOG_LEVEL") {
            self.telemetry.log_level = val;
        }
        if let Some(val) = parsed(&lookup, "LETHE_LOG_JSON") {
            self.telemetry.json = val;
        }
        if let Some(val) = parsed(&lookup, "LETHE_RECOVERY_TIMEOUT_MS") {
            self.recovery.recovery_timeout_ms = val;
        }
        if let Some(val) = parsed(&lookup, "LETHE_MAX_RECOVERY_ATTEMPTS") {
            self.recovery.max_recovery_attempts = val;
        }
        if let Some(val) = parsed(&lookup, "LETHE_AUTO_EXECUTE") {
            self.forgetting.auto_execute = val;
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable override");
            None
        }
    }
}
