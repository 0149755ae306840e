//! Per-period records
//!
//! One `TimeStepRecord` per aligned time index. Fields that cannot be
//! computed yet (the first period's return, the warm-up baseline) are `None`
//! rather than sentinel values.

use serde::{Deserialize, Serialize};

use crate::domain::error::BacktestError;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStepRecord {
    /// Index in the untrimmed aligned input
    pub step: usize,
    /// Date or timestamp text from the input, when supplied
    pub label: Option<String>,
    pub interest: f64,
    pub price: f64,
    /// `price[t] / price[t-1]`
    pub period_return: Option<f64>,
    /// Mean interest over the window ending one step before `step`
    pub baseline: Option<f64>,
    /// `interest - baseline`
    pub deviation: Option<f64>,
    pub signal: Option<Signal>,
}

impl TimeStepRecord {
    /// A record is tradable once both its signal and its return exist
    pub fn is_defined(&self) -> bool {
        self.signal.is_some() && self.period_return.is_some()
    }
}

/// Gross period returns `p[t] / p[t-1]`; the first entry is always `None`.
pub fn period_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return returns;
    }
    returns.push(None);
    returns.extend(prices.windows(2).map(|w| Some(w[1] / w[0])));
    returns
}

/// Column inputs for `build_records`, all indexed by the same time step
pub struct RecordColumns<'a> {
    pub labels: Option<&'a [String]>,
    pub interest: &'a [f64],
    pub price: &'a [f64],
    pub baseline: &'a [Option<f64>],
    pub deviation: &'a [Option<f64>],
    pub signals: &'a [Option<Signal>],
}

/// Zip the column vectors into records. Every column must have the same length.
pub fn build_records(columns: RecordColumns<'_>) -> Result<Vec<TimeStepRecord>, BacktestError> {
    let n = columns.interest.len();
    if columns.price.len() != n {
        return Err(BacktestError::MisalignedInput {
            interest: n,
            price: columns.price.len(),
        });
    }

    let derived = [
        ("baseline", columns.baseline.len()),
        ("deviation", columns.deviation.len()),
        ("signal", columns.signals.len()),
        ("label", columns.labels.map_or(n, |l| l.len())),
    ];
    for (name, len) in derived {
        if len != n {
            return Err(BacktestError::invalid_parameter(format!(
                "{} column has {} entries, expected {}",
                name, len, n
            )));
        }
    }

    let returns = period_returns(columns.price);

    Ok((0..n)
        .map(|t| TimeStepRecord {
            step: t,
            label: columns.labels.map(|l| l[t].clone()),
            interest: columns.interest[t],
            price: columns.price[t],
            period_return: returns[t],
            baseline: columns.baseline[t],
            deviation: columns.deviation[t],
            signal: columns.signals[t],
        })
        .collect())
}

/// Drop the first `warmup` records, where no baseline exists yet.
///
/// Fails if any record left after the cut is still undefined; that means the
/// warm-up length and the signal column disagree.
pub fn trim_warmup(
    records: Vec<TimeStepRecord>,
    warmup: usize,
) -> Result<Vec<TimeStepRecord>, BacktestError> {
    if warmup >= records.len() {
        return Err(BacktestError::invalid_parameter(format!(
            "warm-up of {} steps leaves nothing of a {}-step series",
            warmup,
            records.len()
        )));
    }

    let trimmed: Vec<TimeStepRecord> = records.into_iter().skip(warmup).collect();
    if let Some(bad) = trimmed.iter().find(|r| !r.is_defined()) {
        return Err(BacktestError::undefined(format!(
            "step {} has no signal or return after trimming {} warm-up steps",
            bad.step, warmup
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_period_returns() {
        let returns = period_returns(&[100.0, 110.0, 99.0, 99.0]);
        assert_eq!(returns.len(), 4);
        assert!(returns[0].is_none());
        assert_relative_eq!(returns[1].unwrap(), 1.1, epsilon = 1e-12);
        assert_relative_eq!(returns[2].unwrap(), 0.9, epsilon = 1e-12);
        assert_relative_eq!(returns[3].unwrap(), 1.0, epsilon = 1e-12);

        assert!(period_returns(&[]).is_empty());
        assert_eq!(period_returns(&[5.0]), vec![None::<f64>]);
    }

    fn sample_columns() -> (Vec<f64>, Vec<f64>, Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<Signal>>) {
        let interest = vec![10.0, 10.0, 10.0, 10.0, 20.0];
        let price = vec![100.0, 101.0, 102.0, 103.0, 104.0];
        let baseline = vec![None, None, None, Some(10.0), Some(10.0)];
        let deviation = vec![None, None, None, Some(0.0), Some(10.0)];
        let signals = vec![None, None, None, Some(Signal::Short), Some(Signal::Long)];
        (interest, price, baseline, deviation, signals)
    }

    #[test]
    fn test_build_and_trim() {
        let (interest, price, baseline, deviation, signals) = sample_columns();
        let records = build_records(RecordColumns {
            labels: None,
            interest: &interest,
            price: &price,
            baseline: &baseline,
            deviation: &deviation,
            signals: &signals,
        })
        .unwrap();

        assert_eq!(records.len(), 5);
        assert!(!records[2].is_defined());
        assert!(records[3].is_defined());

        let trimmed = trim_warmup(records, 3).unwrap();
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].step, 3);
        assert_eq!(trimmed[1].signal, Some(Signal::Long));
    }

    #[test]
    fn test_build_rejects_short_column() {
        let (interest, price, baseline, deviation, _) = sample_columns();
        let signals = vec![None, None];
        let result = build_records(RecordColumns {
            labels: None,
            interest: &interest,
            price: &price,
            baseline: &baseline,
            deviation: &deviation,
            signals: &signals,
        });
        assert!(matches!(result, Err(BacktestError::InvalidParameter(_))));
    }

    #[test]
    fn test_build_carries_labels() {
        let (interest, price, baseline, deviation, signals) = sample_columns();
        let labels: Vec<String> = (1..=5).map(|d| format!("2020-01-0{}", d)).collect();
        let records = build_records(RecordColumns {
            labels: Some(&labels),
            interest: &interest,
            price: &price,
            baseline: &baseline,
            deviation: &deviation,
            signals: &signals,
        })
        .unwrap();
        assert_eq!(records[4].label.as_deref(), Some("2020-01-05"));
    }

    #[test]
    fn test_trim_too_short_warmup_is_undefined() {
        let (interest, price, baseline, deviation, signals) = sample_columns();
        let records = build_records(RecordColumns {
            labels: None,
            interest: &interest,
            price: &price,
            baseline: &baseline,
            deviation: &deviation,
            signals: &signals,
        })
        .unwrap();
        assert!(matches!(trim_warmup(records, 2), Err(BacktestError::Undefined(_))));
    }

    #[test]
    fn test_trim_everything_is_invalid() {
        let (interest, price, baseline, deviation, signals) = sample_columns();
        let records = build_records(RecordColumns {
            labels: None,
            interest: &interest,
            price: &price,
            baseline: &baseline,
            deviation: &deviation,
            signals: &signals,
        })
        .unwrap();
        assert!(matches!(
            trim_warmup(records, 5),
            Err(BacktestError::InvalidParameter(_))
        ));
    }
}
