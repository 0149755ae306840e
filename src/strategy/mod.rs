//! Strategy Layer - Search-interest baseline deviation signals
//!
//! Implements the signal side of the backtest:
//! - Lagged rolling-mean baseline of search interest over Δt periods
//! - Deviation of each point from the previous period's baseline
//! - Sign rule mapping deviation to LONG/SHORT, with configurable polarity
//!
//! Strategy Options:
//! - `TrendSignalStrategy`: baseline deviation + sign rule (the production strategy)

pub mod params;
pub mod baseline;
pub mod signal_generator;
pub mod trend_strategy;

pub use params::{BacktestConfig, ConfigError, SignalPolarity};
pub use baseline::{BaselineDeviation, BaselineDeviationComputer};
pub use signal_generator::SignalGenerator;
pub use trend_strategy::TrendSignalStrategy;
