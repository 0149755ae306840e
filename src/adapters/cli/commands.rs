//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the trends backtester.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::adapters::csv_source::{CsvColumn, CsvSeriesSource};
use crate::adapters::report;
use crate::application::Backtester;
use crate::config::{expand_path, load_config, Config};
use crate::ports::SeriesSource;
use crate::strategy::{BacktestConfig, SignalPolarity};

/// Search-interest signal backtester
#[derive(Parser, Debug)]
#[command(
    name = "trends-backtest",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Backtest a long/short signal derived from search-interest data",
    long_about = "Compares each period's search interest with the mean of the previous Δt \
                  periods, goes long or short on the sign of the difference, and reports \
                  the result against buy-and-hold."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print the performance summary
    Backtest(BacktestCmd),

    /// Print the per-period baseline, deviation and signal table
    Signals(SignalsCmd),
}

/// Input files, from a config file and/or flags
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV file with the search-interest series (overrides config)
    #[arg(long, value_name = "FILE")]
    pub interest: Option<String>,

    /// CSV file with the price series (overrides config)
    #[arg(long, value_name = "FILE")]
    pub prices: Option<String>,

    /// Interest value column
    #[arg(long, value_name = "NAME")]
    pub interest_column: Option<String>,

    /// Price value column
    #[arg(long, value_name = "NAME")]
    pub price_column: Option<String>,

    /// Date column in the interest file
    #[arg(long, value_name = "NAME")]
    pub label_column: Option<String>,
}

/// Backtest parameter overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Override baseline window (Δt)
    #[arg(short, long, value_name = "PERIODS")]
    pub window: Option<usize>,

    /// Override periods per year used for annualization
    #[arg(long, value_name = "N")]
    pub periods_per_year: Option<u32>,

    /// Override starting equity
    #[arg(long, value_name = "AMOUNT")]
    pub initial_equity: Option<f64>,

    /// Override signal polarity (momentum, contrarian)
    #[arg(long, value_name = "POLARITY")]
    pub polarity: Option<SignalPolarity>,
}

/// Run a backtest
#[derive(Parser, Debug)]
pub struct BacktestCmd {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Export summary to JSON
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Export per-period equity curves to CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,
}

/// Print the signal table
#[derive(Parser, Debug)]
pub struct SignalsCmd {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Everything a command needs after merging config file and flags
#[derive(Debug)]
pub struct ResolvedRun {
    pub source: CsvSeriesSource,
    pub config: BacktestConfig,
    pub log_level: Option<String>,
}

/// Merge the optional config file with command-line overrides
pub fn resolve(data: &DataArgs, params: &ParamArgs) -> Result<ResolvedRun> {
    let file_config: Option<Config> = match &data.config {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            Some(load_config(&path).with_context(|| format!("Failed to load configuration from {}", path.display()))?)
        }
        None => None,
    };

    let file_data = file_config.as_ref().map(|c| &c.data);
    let interest_path = data
        .interest
        .clone()
        .or_else(|| file_data.map(|d| d.interest_path.clone()));
    let price_path = data
        .prices
        .clone()
        .or_else(|| file_data.map(|d| d.price_path.clone()));

    let (interest_path, price_path) = match (interest_path, price_path) {
        (Some(i), Some(p)) => (i, p),
        _ => bail!("Input files missing: pass --config FILE or both --interest and --prices"),
    };

    let interest_column = data
        .interest_column
        .clone()
        .or_else(|| file_data.map(|d| d.interest_column.clone()))
        .unwrap_or_else(|| "Adjusted".to_string());
    let price_column = data
        .price_column
        .clone()
        .or_else(|| file_data.map(|d| d.price_column.clone()))
        .unwrap_or_else(|| "Close".to_string());
    let label_column = data
        .label_column
        .clone()
        .or_else(|| file_data.and_then(|d| d.label_column.clone()));

    let mut source = CsvSeriesSource::new(
        CsvColumn::new(expand_path(&interest_path), interest_column),
        CsvColumn::new(expand_path(&price_path), price_column),
    );
    if let Some(label) = label_column {
        source = source.with_label_column(label);
    }

    let mut config = file_config
        .as_ref()
        .map(BacktestConfig::from)
        .unwrap_or_default();
    if let Some(window) = params.window {
        config = config.with_window(window);
    }
    if let Some(n) = params.periods_per_year {
        config = config.with_periods_per_year(n);
    }
    if let Some(equity) = params.initial_equity {
        config = config.with_initial_equity(equity);
    }
    if let Some(polarity) = params.polarity {
        config = config.with_polarity(polarity);
    }
    config.validate().context("Invalid backtest parameters")?;

    Ok(ResolvedRun {
        source,
        config,
        log_level: file_config.map(|c| c.logging.level),
    })
}

/// Execute the CLI command
pub fn execute(app: CliApp) -> Result<()> {
    let (data, params) = match &app.command {
        Command::Backtest(cmd) => (&cmd.data, &cmd.params),
        Command::Signals(cmd) => (&cmd.data, &cmd.params),
    };
    let resolved = resolve(data, params)?;

    // Initialize logging based on flags, falling back to the config file level
    init_logging(app.verbose, app.debug, resolved.log_level.as_deref())?;

    match app.command {
        Command::Backtest(cmd) => backtest_command(cmd, resolved),
        Command::Signals(_) => signals_command(resolved),
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, config_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        config_level.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Handle backtest command
fn backtest_command(cmd: BacktestCmd, resolved: ResolvedRun) -> Result<()> {
    tracing::info!("Starting backtest on {}", resolved.source.describe());
    tracing::info!(
        "Parameters: window {}, {} periods/year, polarity {}",
        resolved.config.window_size,
        resolved.config.periods_per_year,
        resolved.config.polarity
    );

    let backtester = Backtester::with_trend_strategy(resolved.config);
    let report = backtester
        .run_from_source(&resolved.source)
        .context("Backtest failed")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print!("{}", report::format_summary(&report));
    }

    if let Some(ref path) = cmd.export_json {
        report::write_summary_json(path, &report.summary)
            .with_context(|| format!("Failed to export JSON to {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    if let Some(ref path) = cmd.export_csv {
        report::write_equity_csv(path, &report)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
        println!("Equity curve written to {}", path.display());
    }

    Ok(())
}

/// Handle signals command
fn signals_command(resolved: ResolvedRun) -> Result<()> {
    let series = resolved
        .source
        .load()
        .with_context(|| format!("Failed to load {}", resolved.source.describe()))?;

    let backtester = Backtester::with_trend_strategy(resolved.config);
    let records = backtester.records(&series).context("Signal generation failed")?;

    print!("{}", report::format_signal_table(&records));
    Ok(())
}
