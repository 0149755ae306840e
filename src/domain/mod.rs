//! Domain Layer - Core backtest types and simulation logic
//!
//! This module contains pure domain types and logic with no I/O.
//! All external interactions happen through the ports layer.

pub mod error;
pub mod signal;
pub mod record;
pub mod portfolio;
pub mod stats;

pub use error::{BacktestError, ensure_finite};
pub use signal::Signal;
pub use record::{TimeStepRecord, RecordColumns, build_records, period_returns, trim_warmup};
pub use portfolio::{PortfolioSimulator, SimulationState, SimulationResult, DEFAULT_INITIAL_EQUITY};
pub use stats::{PerformanceSummary, accuracy_pct, annualized_return_pct, total_return_pct};
