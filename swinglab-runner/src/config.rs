//! Run configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty string (or a file
//! with only the sections the user cares about) is a valid configuration.
//! CLI flags overlay these values; the config never overrides an explicit
//! flag.

use serde::{Deserialize, Serialize};
use std::path::Path;
use swinglab_core::backtest::BacktestParams;
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors from loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub backtest: BacktestSection,
    pub scan: ScanSection,
    pub batch: BatchSection,
}

/// `[backtest]` — per-symbol simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub lookback_days: usize,
    pub max_hold_days: usize,
    pub initial_capital: f64,
    pub filter_shocks: bool,
    pub shock_threshold: f64,
}

impl Default for BacktestSection {
    fn default() -> Self {
        let params = BacktestParams::default();
        Self {
            lookback_days: params.lookback_days,
            max_hold_days: params.max_hold_days,
            initial_capital: params.initial_capital,
            filter_shocks: params.filter_shocks,
            shock_threshold: params.shock_threshold,
        }
    }
}

/// `[scan]` — latest-day scan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Trading bars kept for the three-bar window.
    pub window_days: usize,
    /// Calendar padding on the fetch range so weekends and holidays still
    /// leave enough trading days.
    pub pad_days: i64,
    /// Pause before each symbol fetch, in milliseconds.
    pub delay_ms: u64,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            window_days: 3,
            pad_days: 5,
            delay_ms: 500,
        }
    }
}

/// `[batch]` — multi-symbol backtest parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Pause before each symbol fetch, in milliseconds.
    pub delay_ms: u64,
    /// Truncate the roster to this many symbols (handy for smoke runs).
    pub max_symbols: Option<usize>,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            delay_ms: 1_000,
            max_symbols: None,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Deterministic hash ID for this configuration. Two runs with identical
    /// configs share a RunId, which makes result files comparable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }

    /// The `[backtest]` section as engine parameters.
    pub fn backtest_params(&self) -> BacktestParams {
        BacktestParams {
            lookback_days: self.backtest.lookback_days,
            max_hold_days: self.backtest.max_hold_days,
            initial_capital: self.backtest.initial_capital,
            filter_shocks: self.backtest.filter_shocks,
            shock_threshold: self.backtest.shock_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.backtest.lookback_days, 252);
        assert_eq!(config.backtest.shock_threshold, 0.25);
        assert_eq!(config.scan.window_days, 3);
        assert_eq!(config.scan.delay_ms, 500);
        assert_eq!(config.batch.delay_ms, 1_000);
        assert_eq!(config.batch.max_symbols, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RunConfig::from_toml(
            r#"
            [backtest]
            lookback_days = 90
            filter_shocks = false

            [batch]
            max_symbols = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.backtest.lookback_days, 90);
        assert!(!config.backtest.filter_shocks);
        assert_eq!(config.backtest.max_hold_days, 10);
        assert_eq!(config.batch.max_symbols, Some(25));
        assert_eq!(config.batch.delay_ms, 1_000);
        assert_eq!(config.scan, ScanSection::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = RunConfig::from_toml("[backtest\nlookback_days = 90").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn backtest_params_mirror_the_section() {
        let config = RunConfig::from_toml(
            r#"
            [backtest]
            lookback_days = 504
            max_hold_days = 5
            initial_capital = 25000.0
            shock_threshold = 0.3
            "#,
        )
        .unwrap();

        let params = config.backtest_params();
        assert_eq!(params.lookback_days, 504);
        assert_eq!(params.max_hold_days, 5);
        assert_eq!(params.initial_capital, 25_000.0);
        assert!(params.filter_shocks);
        assert_eq!(params.shock_threshold, 0.3);
    }

    #[test]
    fn run_id_is_deterministic() {
        let config = RunConfig::default();
        let id1 = config.run_id();
        let id2 = config.run_id();
        assert_eq!(id1, id2);
        assert!(!id1.is_empty());
    }

    #[test]
    fn run_id_changes_with_params() {
        let base = RunConfig::default();
        let mut tweaked = base.clone();
        tweaked.backtest.lookback_days = 90;
        assert_ne!(base.run_id(), tweaked.run_id());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = RunConfig::default();
        config.batch.max_symbols = Some(10);
        let text = toml::to_string(&config).unwrap();
        let parsed = RunConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
