//! Ports Layer - Trait definitions for external collaborators
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Input series (search interest and prices)
//! - Strategy signal generation

pub mod market_data;
pub mod strategy;

pub use market_data::{AlignedSeries, SeriesSource, SourceError};
pub use strategy::{ConstantSignalStrategy, SignalStrategy, StrategyOutput};
