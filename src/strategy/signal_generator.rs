//! Signal Generator
//!
//! Turns the deviation column into LONG/SHORT directives with a sign rule.
//! A deviation of exactly zero never counts as positive.

use crate::domain::signal::Signal;
use crate::strategy::params::SignalPolarity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalGenerator {
    polarity: SignalPolarity,
}

impl SignalGenerator {
    pub fn new(polarity: SignalPolarity) -> Self {
        Self { polarity }
    }

    pub fn polarity(&self) -> SignalPolarity {
        self.polarity
    }

    /// Signal for a single defined deviation
    pub fn classify(&self, deviation: f64) -> Signal {
        let momentum = if deviation > 0.0 { Signal::Long } else { Signal::Short };
        match self.polarity {
            SignalPolarity::Momentum => momentum,
            SignalPolarity::Contrarian => momentum.flip(),
        }
    }

    /// Map every deviation to a signal; undefined stays undefined
    pub fn generate(&self, deviation: &[Option<f64>]) -> Vec<Option<Signal>> {
        deviation.iter().map(|d| d.map(|d| self.classify(d))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_rule() {
        let generator = SignalGenerator::default();
        assert_eq!(generator.classify(10.0), Signal::Long);
        assert_eq!(generator.classify(0.0), Signal::Short);
        assert_eq!(generator.classify(-0.0), Signal::Short);
        assert_eq!(generator.classify(-3.3), Signal::Short);
    }

    #[test]
    fn test_contrarian_rule() {
        let generator = SignalGenerator::new(SignalPolarity::Contrarian);
        assert_eq!(generator.classify(10.0), Signal::Short);
        assert_eq!(generator.classify(0.0), Signal::Long);
        assert_eq!(generator.classify(-3.3), Signal::Long);
    }

    #[test]
    fn test_undefined_passthrough() {
        let generator = SignalGenerator::default();
        let deviation = [None, None, None, Some(0.0), Some(10.0), Some(-10.0 / 3.0)];
        let signals = generator.generate(&deviation);

        assert_eq!(
            signals,
            vec![None, None, None, Some(Signal::Short), Some(Signal::Long), Some(Signal::Short)]
        );
    }

    #[test]
    fn test_polarities_disagree_everywhere() {
        let deviation: Vec<Option<f64>> = (-5..=5).map(|d| Some(d as f64 * 0.5)).collect();
        let momentum = SignalGenerator::new(SignalPolarity::Momentum).generate(&deviation);
        let contrarian = SignalGenerator::new(SignalPolarity::Contrarian).generate(&deviation);

        for (m, c) in momentum.iter().zip(&contrarian) {
            assert_eq!(m.map(|s| s.flip()), *c);
        }
    }
}
