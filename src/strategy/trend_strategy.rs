//! Search-interest trend strategy
//!
//! Baseline deviation followed by the sign rule. The first `window_size`
//! points have no baseline and therefore no signal.

use crate::domain::error::BacktestError;
use crate::ports::strategy::{SignalStrategy, StrategyOutput};
use crate::strategy::baseline::BaselineDeviationComputer;
use crate::strategy::params::{BacktestConfig, SignalPolarity};
use crate::strategy::signal_generator::SignalGenerator;

#[derive(Debug, Clone)]
pub struct TrendSignalStrategy {
    computer: BaselineDeviationComputer,
    generator: SignalGenerator,
}

impl TrendSignalStrategy {
    pub fn new(window_size: usize, polarity: SignalPolarity) -> Self {
        Self {
            computer: BaselineDeviationComputer::new(window_size),
            generator: SignalGenerator::new(polarity),
        }
    }

    pub fn window_size(&self) -> usize {
        self.computer.window_size()
    }

    pub fn polarity(&self) -> SignalPolarity {
        self.generator.polarity()
    }
}

impl From<&BacktestConfig> for TrendSignalStrategy {
    fn from(config: &BacktestConfig) -> Self {
        Self::new(config.window_size, config.polarity)
    }
}

impl SignalStrategy for TrendSignalStrategy {
    fn name(&self) -> &str {
        "search-interest-trend"
    }

    fn generate_signals(&self, interest: &[f64]) -> Result<StrategyOutput, BacktestError> {
        let columns = self.computer.compute(interest)?;
        let signals = self.generator.generate(&columns.deviation);
        tracing::debug!(
            window = self.window_size(),
            polarity = %self.polarity(),
            "classified deviations"
        );

        Ok(StrategyOutput {
            baseline: columns.baseline,
            deviation: columns.deviation,
            signals,
            warmup: self.window_size(),
        })
    }
}
