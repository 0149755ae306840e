//! Adapters Layer - External implementations of ports
//!
//! - `csv_source`: CSV files as the input series source
//! - `report`: text, JSON and CSV output of backtest results
//! - `cli`: command-line entry

pub mod csv_source;
pub mod report;
pub mod cli;

pub use csv_source::{CsvColumn, CsvSeriesSource};
pub use report::{format_signal_table, format_summary, write_equity_csv, write_summary_json, ReportError};
