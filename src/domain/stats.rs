//! Performance Statistics
//!
//! Return and accuracy figures derived from a finished simulation.
//!
//! Annualized return is the geometric-mean period return scaled to one year:
//! `((last / initial) ^ (periods_per_year / n) - 1) * 100`.
//!
//! None of these functions hand NaN or infinity back to the caller; degenerate
//! inputs are reported as `BacktestError::Undefined`.

use serde::{Deserialize, Serialize};

use crate::domain::error::BacktestError;
use crate::domain::portfolio::SimulationResult;

fn last_point(curve: &[f64]) -> Result<f64, BacktestError> {
    curve
        .last()
        .copied()
        .ok_or_else(|| BacktestError::undefined("statistics requested over an empty curve"))
}

fn finite(value: f64, what: &str) -> Result<f64, BacktestError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BacktestError::undefined(format!("{} is not finite ({})", what, value)))
    }
}

fn check_initial(initial_equity: f64) -> Result<(), BacktestError> {
    if initial_equity.is_finite() && initial_equity > 0.0 {
        Ok(())
    } else {
        Err(BacktestError::invalid_parameter(format!(
            "initial equity must be a positive finite number, got {}",
            initial_equity
        )))
    }
}

/// Percentage gain of the curve's final point over the starting equity
pub fn total_return_pct(curve: &[f64], initial_equity: f64) -> Result<f64, BacktestError> {
    check_initial(initial_equity)?;
    let last = last_point(curve)?;
    finite((last / initial_equity - 1.0) * 100.0, "total return")
}

/// Compound annual growth of the curve, in percent
pub fn annualized_return_pct(
    curve: &[f64],
    initial_equity: f64,
    periods_per_year: u32,
) -> Result<f64, BacktestError> {
    check_initial(initial_equity)?;
    if periods_per_year == 0 {
        return Err(BacktestError::invalid_parameter("periods_per_year must be > 0"));
    }
    let last = last_point(curve)?;
    let exponent = f64::from(periods_per_year) / curve.len() as f64;
    finite(
        ((last / initial_equity).powf(exponent) - 1.0) * 100.0,
        "annualized return",
    )
}

/// Share of periods where the held position made money, in percent
pub fn accuracy_pct(correct_count: u64, total_count: u64) -> Result<f64, BacktestError> {
    if total_count == 0 {
        return Err(BacktestError::undefined("accuracy over zero periods"));
    }
    Ok(correct_count as f64 / total_count as f64 * 100.0)
}

/// Headline figures for one backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub periods: usize,
    pub periods_per_year: u32,
    pub strategy_final_equity: f64,
    pub benchmark_final_equity: f64,
    pub strategy_total_return_pct: f64,
    pub strategy_annualized_return_pct: f64,
    pub benchmark_total_return_pct: f64,
    pub benchmark_annualized_return_pct: f64,
    pub accuracy_pct: f64,
    pub correct_count: u64,
    pub long_count: usize,
    pub short_count: usize,
}

impl PerformanceSummary {
    pub fn from_result(
        result: &SimulationResult,
        periods_per_year: u32,
    ) -> Result<Self, BacktestError> {
        let initial = result.initial_equity;
        Ok(Self {
            periods: result.len(),
            periods_per_year,
            strategy_final_equity: last_point(&result.strategy_curve)?,
            benchmark_final_equity: last_point(&result.benchmark_curve)?,
            strategy_total_return_pct: total_return_pct(&result.strategy_curve, initial)?,
            strategy_annualized_return_pct: annualized_return_pct(
                &result.strategy_curve,
                initial,
                periods_per_year,
            )?,
            benchmark_total_return_pct: total_return_pct(&result.benchmark_curve, initial)?,
            benchmark_annualized_return_pct: annualized_return_pct(
                &result.benchmark_curve,
                initial,
                periods_per_year,
            )?,
            accuracy_pct: accuracy_pct(result.correct_count, result.total_count)?,
            correct_count: result.correct_count,
            long_count: result.long_indices.len(),
            short_count: result.short_indices.len(),
        })
    }

    /// Annualized edge of the strategy over buy-and-hold, in percentage points
    pub fn excess_annualized_return_pct(&self) -> f64 {
        self.strategy_annualized_return_pct - self.benchmark_annualized_return_pct
    }

    /// Length of the simulated period in years
    pub fn years(&self) -> f64 {
        self.periods as f64 / f64::from(self.periods_per_year)
    }
}
