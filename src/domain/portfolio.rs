use serde::{Deserialize, Serialize};

use crate::domain::error::BacktestError;
use crate::domain::record::TimeStepRecord;
use crate::domain::signal::Signal;

/// Default equity base for both curves
pub const DEFAULT_INITIAL_EQUITY: f64 = 100.0;

/// Mutable state of a single simulation pass
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub strategy_equity: f64,
    pub benchmark_equity: f64,
    pub correct_count: u64,
    pub total_count: u64,
    /// Positions (in the simulated sequence) where a long was held
    pub long_indices: Vec<usize>,
    /// Positions (in the simulated sequence) where a short was held
    pub short_indices: Vec<usize>,
}

impl SimulationState {
    pub fn new(initial_equity: f64) -> Self {
        Self {
            strategy_equity: initial_equity,
            benchmark_equity: initial_equity,
            correct_count: 0,
            total_count: 0,
            long_indices: Vec::new(),
            short_indices: Vec::new(),
        }
    }

    /// Advance one period
    pub fn step(&mut self, index: usize, signal: Signal, period_return: f64) {
        self.strategy_equity = signal.apply(self.strategy_equity, period_return);
        match signal {
            Signal::Long => self.long_indices.push(index),
            Signal::Short => self.short_indices.push(index),
        }
        if signal.was_profitable(period_return) {
            self.correct_count += 1;
        }

        self.benchmark_equity *= period_return;
        self.total_count += 1;
    }
}

/// Terminal output of a simulation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub initial_equity: f64,
    /// Strategy equity after each period
    pub strategy_curve: Vec<f64>,
    /// Buy-and-hold equity after each period
    pub benchmark_curve: Vec<f64>,
    pub correct_count: u64,
    pub total_count: u64,
    pub long_indices: Vec<usize>,
    pub short_indices: Vec<usize>,
}

impl SimulationResult {
    pub fn final_strategy_equity(&self) -> Option<f64> {
        self.strategy_curve.last().copied()
    }

    pub fn final_benchmark_equity(&self) -> Option<f64> {
        self.benchmark_curve.last().copied()
    }

    pub fn len(&self) -> usize {
        self.strategy_curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategy_curve.is_empty()
    }
}

/// Walks signals and returns in lockstep, compounding a long/short strategy
/// against buy-and-hold
#[derive(Debug, Clone)]
pub struct PortfolioSimulator {
    initial_equity: f64,
}

impl Default for PortfolioSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_EQUITY)
    }
}

impl PortfolioSimulator {
    pub fn new(initial_equity: f64) -> Self {
        Self { initial_equity }
    }

    /// Run one pass over the trimmed records.
    ///
    /// Every record must carry both a signal and a period return.
    pub fn simulate(&self, records: &[TimeStepRecord]) -> Result<SimulationResult, BacktestError> {
        if records.is_empty() {
            return Err(BacktestError::undefined("cannot simulate an empty record sequence"));
        }
        if !self.initial_equity.is_finite() || self.initial_equity <= 0.0 {
            return Err(BacktestError::invalid_parameter(format!(
                "initial equity must be a positive finite number, got {}",
                self.initial_equity
            )));
        }

        let mut state = SimulationState::new(self.initial_equity);
        let mut strategy_curve = Vec::with_capacity(records.len());
        let mut benchmark_curve = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let (signal, period_return) = match (record.signal, record.period_return) {
                (Some(_), Some(r)) if !(r.is_finite() && r > 0.0) => {
                    return Err(BacktestError::invalid_parameter(format!(
                        "step {} has period return {}, expected a positive finite ratio",
                        record.step, r
                    )))
                }
                (Some(s), Some(r)) => (s, r),
                _ => {
                    return Err(BacktestError::undefined(format!(
                        "step {} has no signal or period return",
                        record.step
                    )))
                }
            };

            state.step(i, signal, period_return);
            strategy_curve.push(state.strategy_equity);
            benchmark_curve.push(state.benchmark_equity);

            tracing::debug!(
                step = record.step,
                %signal,
                period_return,
                strategy = state.strategy_equity,
                benchmark = state.benchmark_equity,
                "simulated period"
            );
        }

        tracing::info!(
            periods = state.total_count,
            correct = state.correct_count,
            longs = state.long_indices.len(),
            shorts = state.short_indices.len(),
            strategy = state.strategy_equity,
            benchmark = state.benchmark_equity,
            "simulation complete"
        );

        Ok(SimulationResult {
            initial_equity: self.initial_equity,
            strategy_curve,
            benchmark_curve,
            correct_count: state.correct_count,
            total_count: state.total_count,
            long_indices: state.long_indices,
            short_indices: state.short_indices,
        })
    }
}
