//! CLI Adapter
//!
//! Command-line interface for the trends backtester.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    resolve, BacktestCmd, CliApp, Command, DataArgs, ParamArgs, ResolvedRun, SignalsCmd,
};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub fn execute(app: CliApp) -> Result<()> {
    commands::execute(app)
}
