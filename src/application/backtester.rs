//! Backtester
//!
//! Coordinates the search-interest strategy with the portfolio simulator.
//! One linear pass: align → baseline → signal → records → simulate → statistics.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    build_records, ensure_finite, trim_warmup, BacktestError, PerformanceSummary,
    PortfolioSimulator, RecordColumns, SimulationResult, TimeStepRecord,
};
use crate::ports::{AlignedSeries, SeriesSource, SignalStrategy, SourceError};
use crate::strategy::{BacktestConfig, TrendSignalStrategy};

#[derive(Debug, Error)]
pub enum BacktesterError {
    #[error("Backtest error: {0}")]
    Backtest(#[from] BacktestError),
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
}

/// Everything a reporting collaborator needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub strategy: String,
    pub config: BacktestConfig,
    /// Trimmed records, one per simulated period
    pub records: Vec<TimeStepRecord>,
    pub result: SimulationResult,
    pub summary: PerformanceSummary,
}

/// Runs one backtest over aligned interest and price series
pub struct Backtester {
    config: BacktestConfig,
    strategy: Box<dyn SignalStrategy>,
}

impl Backtester {
    /// Create a backtester with an explicit strategy
    pub fn new(config: BacktestConfig, strategy: Box<dyn SignalStrategy>) -> Self {
        Self { config, strategy }
    }

    /// Create a backtester running the search-interest trend strategy
    pub fn with_trend_strategy(config: BacktestConfig) -> Self {
        let strategy = TrendSignalStrategy::from(&config);
        Self::new(config, Box::new(strategy))
    }

    /// Produce the untrimmed per-step records, warm-up included
    pub fn records(&self, series: &AlignedSeries) -> Result<Vec<TimeStepRecord>, BacktestError> {
        self.prepare(series).map(|(records, _)| records)
    }

    /// Validate the input, run the strategy and zip everything into records.
    /// Also returns the strategy's warm-up length.
    fn prepare(&self, series: &AlignedSeries) -> Result<(Vec<TimeStepRecord>, usize), BacktestError> {
        if !series.is_aligned() {
            return Err(BacktestError::MisalignedInput {
                interest: series.interest.len(),
                price: series.price.len(),
            });
        }
        self.config.validate_for_len(series.len())?;
        ensure_finite("interest", &series.interest)?;
        ensure_finite("price", &series.price)?;
        if let Some(index) = series.price.iter().position(|&p| p <= 0.0) {
            return Err(BacktestError::invalid_parameter(format!(
                "price[{}] = {} must be positive",
                index, series.price[index]
            )));
        }

        let output = self.strategy.generate_signals(&series.interest)?;
        let (longs, shorts) = output.counts();
        tracing::info!(
            strategy = self.strategy.name(),
            points = series.len(),
            warmup = output.warmup,
            longs,
            shorts,
            "signals generated"
        );

        let records = build_records(RecordColumns {
            labels: series.labels.as_deref(),
            interest: &series.interest,
            price: &series.price,
            baseline: &output.baseline,
            deviation: &output.deviation,
            signals: &output.signals,
        })?;

        Ok((records, output.warmup))
    }

    /// Run the full pipeline over in-memory series
    pub fn run(&self, series: &AlignedSeries) -> Result<BacktestReport, BacktestError> {
        let (records, warmup) = self.prepare(series)?;
        let records = trim_warmup(records, warmup)?;
        tracing::debug!(warmup, remaining = records.len(), "trimmed warm-up region");

        let simulator = PortfolioSimulator::new(self.config.initial_equity);
        let result = simulator.simulate(&records)?;
        let summary = PerformanceSummary::from_result(&result, self.config.periods_per_year)?;

        tracing::info!(
            total_return_pct = summary.strategy_total_return_pct,
            annualized_pct = summary.strategy_annualized_return_pct,
            benchmark_annualized_pct = summary.benchmark_annualized_return_pct,
            accuracy_pct = summary.accuracy_pct,
            "backtest complete"
        );

        Ok(BacktestReport {
            strategy: self.strategy.name().to_string(),
            config: self.config.clone(),
            records,
            result,
            summary,
        })
    }

    /// Load series from a source, then run
    pub fn run_from_source(&self, source: &dyn SeriesSource) -> Result<BacktestReport, BacktesterError> {
        tracing::info!("Loading series from {}", source.describe());
        let series = source.load()?;
        Ok(self.run(&series)?)
    }
}
