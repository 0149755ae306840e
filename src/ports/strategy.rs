use crate::domain::error::BacktestError;
use crate::domain::signal::Signal;

/// Core trait for signal strategies
pub trait SignalStrategy {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Derive per-period signals from the interest series
    fn generate_signals(&self, interest: &[f64]) -> Result<StrategyOutput, BacktestError>;
}

/// Columns produced by a strategy, one entry per input point
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutput {
    pub baseline: Vec<Option<f64>>,
    pub deviation: Vec<Option<f64>>,
    pub signals: Vec<Option<Signal>>,
    /// Leading points with no signal
    pub warmup: usize,
}

impl StrategyOutput {
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Number of LONG and SHORT signals
    pub fn counts(&self) -> (usize, usize) {
        self.signals.iter().flatten().fold((0, 0), |(l, s), sig| match sig {
            Signal::Long => (l + 1, s),
            Signal::Short => (l, s + 1),
        })
    }
}

/// Strategy that emits the same signal every period after a fixed warm-up.
/// Useful as a reference point: an always-long strategy is buy-and-hold.
#[derive(Debug, Clone)]
pub struct ConstantSignalStrategy {
    signal: Signal,
    warmup: usize,
}

impl ConstantSignalStrategy {
    pub fn new(signal: Signal, warmup: usize) -> Self {
        Self { signal, warmup }
    }

    pub fn always_long(warmup: usize) -> Self {
        Self::new(Signal::Long, warmup)
    }
}

impl SignalStrategy for ConstantSignalStrategy {
    fn name(&self) -> &str {
        match self.signal {
            Signal::Long => "always-long",
            Signal::Short => "always-short",
        }
    }

    fn generate_signals(&self, interest: &[f64]) -> Result<StrategyOutput, BacktestError> {
        if self.warmup >= interest.len() {
            return Err(BacktestError::invalid_parameter(format!(
                "warm-up of {} leaves no signals in a series of {}",
                self.warmup,
                interest.len()
            )));
        }
        let defined = |t: usize| t >= self.warmup;
        Ok(StrategyOutput {
            baseline: (0..interest.len()).map(|t| defined(t).then_some(0.0)).collect(),
            deviation: (0..interest.len()).map(|t| defined(t).then_some(0.0)).collect(),
            signals: (0..interest.len()).map(|t| defined(t).then_some(self.signal)).collect(),
            warmup: self.warmup,
        })
    }
}
