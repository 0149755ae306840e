//! Backtest Parameters
//!
//! Configuration structs for the search-interest strategy.
//! Defaults reproduce the weekly setup: a 3-period baseline, 52 periods a year,
//! equity indexed to 100.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::portfolio::DEFAULT_INITIAL_EQUITY;

/// How the sign of the deviation maps onto a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SignalPolarity {
    /// Rising interest goes long: `deviation > 0 => LONG`, otherwise SHORT
    #[default]
    Momentum,
    /// Rising interest goes short: `deviation > 0 => SHORT`, otherwise LONG
    Contrarian,
}

impl fmt::Display for SignalPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPolarity::Momentum => write!(f, "momentum"),
            SignalPolarity::Contrarian => write!(f, "contrarian"),
        }
    }
}

impl FromStr for SignalPolarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "momentum" => Ok(SignalPolarity::Momentum),
            "contrarian" => Ok(SignalPolarity::Contrarian),
            other => Err(format!(
                "unknown polarity '{}' (expected 'momentum' or 'contrarian')",
                other
            )),
        }
    }
}

impl TryFrom<String> for SignalPolarity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Main backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Number of trailing periods averaged into the baseline (Δt)
    pub window_size: usize,
    /// Periods in one year, used for annualization (52 for weekly data)
    pub periods_per_year: u32,
    /// Starting value of both equity curves
    pub initial_equity: f64,
    /// Sign convention for turning deviation into a position
    pub polarity: SignalPolarity,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            periods_per_year: 52,
            initial_equity: DEFAULT_INITIAL_EQUITY,
            polarity: SignalPolarity::Momentum,
        }
    }
}

impl BacktestConfig {
    pub fn with_window(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    pub fn with_initial_equity(mut self, initial_equity: f64) -> Self {
        self.initial_equity = initial_equity;
        self
    }

    pub fn with_polarity(mut self, polarity: SignalPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Validate configuration parameters on their own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindow(self.window_size));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        if !self.initial_equity.is_finite() || self.initial_equity <= 0.0 {
            return Err(ConfigError::InvalidInitialEquity(self.initial_equity));
        }
        Ok(())
    }

    /// Validate against a concrete series length: the window must leave at
    /// least one tradable period
    pub fn validate_for_len(&self, series_len: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.window_size >= series_len {
            return Err(ConfigError::WindowTooLarge {
                window: self.window_size,
                len: series_len,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid window size: {0} (must be > 0)")]
    InvalidWindow(usize),
    #[error("Invalid periods per year: {0} (must be > 0)")]
    InvalidPeriodsPerYear(u32),
    #[error("Invalid initial equity: {0} (must be positive and finite)")]
    InvalidInitialEquity(f64),
    #[error("Window size {window} leaves no tradable periods in a series of {len}")]
    WindowTooLarge { window: usize, len: usize },
}

impl From<ConfigError> for crate::domain::BacktestError {
    fn from(err: ConfigError) -> Self {
        crate::domain::BacktestError::InvalidParameter(err.to_string())
    }
}
