//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/default.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::strategy::params::{BacktestConfig, SignalPolarity};

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backtest: BacktestSection,
    pub data: DataSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Backtest parameters section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    /// Trailing periods averaged into the baseline (Δt)
    pub window_size: usize,
    /// Periods per year for annualization (52 = weekly)
    pub periods_per_year: u32,
    /// Starting equity of both curves
    pub initial_equity: f64,
    /// "momentum" or "contrarian"
    pub polarity: SignalPolarity,
}

impl Default for BacktestSection {
    fn default() -> Self {
        let defaults = BacktestConfig::default();
        Self {
            window_size: defaults.window_size,
            periods_per_year: defaults.periods_per_year,
            initial_equity: defaults.initial_equity,
            polarity: defaults.polarity,
        }
    }
}

/// Input files section
#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// CSV with the search-interest series
    pub interest_path: String,
    /// CSV with the price series
    pub price_path: String,
    /// Column holding search interest
    #[serde(default = "default_interest_column")]
    pub interest_column: String,
    /// Column holding the price level
    #[serde(default = "default_price_column")]
    pub price_column: String,
    /// Optional date column, taken from the interest file
    #[serde(default)]
    pub label_column: Option<String>,
}

fn default_interest_column() -> String {
    "Adjusted".to_string()
}

fn default_price_column() -> String {
    "Close".to_string()
}

impl DataSection {
    /// Interest file path with `~` expanded
    pub fn interest_path(&self) -> PathBuf {
        expand_path(&self.interest_path)
    }

    /// Price file path with `~` expanded
    pub fn price_path(&self) -> PathBuf {
        expand_path(&self.price_path)
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        BacktestConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.data.interest_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "interest_path cannot be empty".to_string(),
            ));
        }

        if self.data.price_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "price_path cannot be empty".to_string(),
            ));
        }

        if self.data.interest_column.is_empty() || self.data.price_column.is_empty() {
            return Err(ConfigError::ValidationError(
                "interest_column and price_column cannot be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}

// Conversion from Config to BacktestConfig
impl From<&Config> for BacktestConfig {
    fn from(config: &Config) -> Self {
        BacktestConfig {
            window_size: config.backtest.window_size,
            periods_per_year: config.backtest.periods_per_year,
            initial_equity: config.backtest.initial_equity,
            polarity: config.backtest.polarity,
        }
    }
}
