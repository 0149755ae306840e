use thiserror::Error;

/// Errors raised by the backtest engine
///
/// Every variant is raised synchronously at the call that detects the
/// violated precondition. Nothing is retried and there are no partial results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Misaligned input: interest series has {interest} points, price series has {price}")]
    MisalignedInput { interest: usize, price: usize },

    #[error("Undefined: {0}")]
    Undefined(String),

    #[error("Invalid input: {series}[{index}] = {value} is not a finite number")]
    InvalidInput {
        series: &'static str,
        index: usize,
        value: f64,
    },
}

impl BacktestError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn undefined(msg: impl Into<String>) -> Self {
        Self::Undefined(msg.into())
    }
}

/// Fail fast on the first NaN or infinite value in a series
pub fn ensure_finite(series: &'static str, values: &[f64]) -> Result<(), BacktestError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(BacktestError::InvalidInput {
            series,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}
