//! Baseline Deviation
//!
//! Rolling baseline of search interest and each point's distance from it.
//!
//! Baseline Formula: N(t) = (n(t-1) + n(t-2) + ... + n(t-Δt)) / Δt
//! Deviation Formula: Δn(t) = n(t) - N(t)
//!
//! The baseline at `t` never includes `n(t)` itself. It is the trailing
//! Δt-wide average shifted forward one position, so a signal traded at `t`
//! only uses information available before `t` closed.

use statrs::statistics::Statistics;

use crate::domain::error::{ensure_finite, BacktestError};

/// Parallel baseline and deviation columns, same length as the input
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineDeviation {
    pub baseline: Vec<Option<f64>>,
    pub deviation: Vec<Option<f64>>,
}

impl BaselineDeviation {
    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    /// Index of the first defined deviation
    pub fn first_defined(&self) -> Option<usize> {
        self.deviation.iter().position(Option::is_some)
    }
}

/// Lagged rolling-mean baseline calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineDeviationComputer {
    window_size: usize,
}

impl BaselineDeviationComputer {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Compute baseline and deviation for every point of `interest`.
    ///
    /// Fails with `InvalidParameter` when the window is zero or would leave
    /// no defined point, and with `InvalidInput` on NaN or infinite values.
    pub fn compute(&self, interest: &[f64]) -> Result<BaselineDeviation, BacktestError> {
        let window = self.window_size;
        if window == 0 {
            return Err(BacktestError::invalid_parameter("window_size must be > 0"));
        }
        if window >= interest.len() {
            return Err(BacktestError::invalid_parameter(format!(
                "window_size {} leaves no defined baseline in a series of {}",
                window,
                interest.len()
            )));
        }
        ensure_finite("interest", interest)?;

        let mut baseline = vec![None; window];
        baseline.extend(interest.windows(window).take(interest.len() - window).map(|w| Some(w.mean())));

        let deviation = interest
            .iter()
            .zip(&baseline)
            .map(|(&n, b)| b.map(|b| n - b))
            .collect();

        tracing::debug!(
            window,
            points = interest.len(),
            defined = interest.len() - window,
            "computed baseline deviation"
        );

        Ok(BaselineDeviation { baseline, deviation })
    }
}

/// Convenience wrapper around `BaselineDeviationComputer::compute`
pub fn compute(interest: &[f64], window_size: usize) -> Result<BaselineDeviation, BacktestError> {
    BaselineDeviationComputer::new(window_size).compute(interest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_scenario() {
        let interest = [10.0, 10.0, 10.0, 10.0, 20.0, 10.0];
        let result = compute(&interest, 3).unwrap();

        assert_eq!(result.len(), 6);
        assert!(result.baseline[..3].iter().all(Option::is_none));
        assert!(result.deviation[..3].iter().all(Option::is_none));

        assert_relative_eq!(result.baseline[3].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(result.deviation[3].unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.baseline[4].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(result.deviation[4].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(result.baseline[5].unwrap(), 40.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(result.deviation[5].unwrap(), 10.0 - 40.0 / 3.0, epsilon = 1e-12);
        assert_eq!(result.first_defined(), Some(3));
    }

    #[test]
    fn test_baseline_ignores_current_point() {
        let interest = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let mut changed = interest;
        changed[4] = 1_000.0;

        let a = compute(&interest, 2).unwrap();
        let b = compute(&changed, 2).unwrap();

        assert_eq!(a.baseline[4], b.baseline[4]);
        assert_ne!(a.deviation[4], b.deviation[4]);
        // later baselines do see the change
        assert_ne!(a.baseline[5], b.baseline[5]);
    }

    #[test]
    fn test_window_of_one_is_previous_point() {
        let interest = [3.0, 5.0, 4.0];
        let result = compute(&interest, 1).unwrap();
        assert_eq!(result.baseline, vec![None, Some(3.0), Some(5.0)]);
        assert_eq!(result.deviation, vec![None, Some(2.0), Some(-1.0)]);
    }

    #[test]
    fn test_invalid_windows() {
        let interest = [1.0, 2.0, 3.0];
        assert!(matches!(compute(&interest, 0), Err(BacktestError::InvalidParameter(_))));
        assert!(matches!(compute(&interest, 3), Err(BacktestError::InvalidParameter(_))));
        assert!(matches!(compute(&interest, 10), Err(BacktestError::InvalidParameter(_))));
        assert!(matches!(compute(&[], 3), Err(BacktestError::InvalidParameter(_))));
    }

    #[test]
    fn test_nan_fails_fast() {
        let interest = [1.0, f64::NAN, 3.0, 4.0];
        assert!(matches!(
            compute(&interest, 2),
            Err(BacktestError::InvalidInput { series: "interest", index: 1, .. })
        ));
    }
}
