//! Trends Backtest - Search-Interest Signal Backtester
//!
//! Backtests a long/short signal derived from search-interest data.

use anyhow::Result;

use trends_backtest::adapters::cli;

fn main() -> Result<()> {
    // Load .env file if it exists (RUST_LOG can be set there)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app)
}
