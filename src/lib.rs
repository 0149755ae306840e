//! Trends Backtest - Search-Interest Signal Backtesting Library
//!
//! Trades a long/short toggle off the deviation of search interest from its
//! own lagged rolling baseline, and measures the result against buy-and-hold.
//!
//! # Modules
//!
//! - `domain`: Core types and logic (Signal, TimeStepRecord, PortfolioSimulator, statistics)
//! - `ports`: Trait abstractions (SeriesSource, SignalStrategy)
//! - `strategy`: Signal generation (BaselineDeviationComputer, SignalGenerator)
//! - `adapters`: External implementations (CSV input, reports, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Backtest pipeline

pub mod domain;
pub mod ports;
pub mod strategy;
pub mod adapters;
pub mod config;
pub mod application;
