use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input series error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Cannot parse '{value}' in {path} row {row}, column '{column}'")]
    Parse {
        path: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("No data rows in {0}")]
    Empty(String),
}

/// Interest and price series sharing one time index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    /// Date or timestamp text per row, if the source has one
    pub labels: Option<Vec<String>>,
    pub interest: Vec<f64>,
    pub price: Vec<f64>,
}

impl AlignedSeries {
    pub fn new(interest: Vec<f64>, price: Vec<f64>) -> Self {
        Self {
            labels: None,
            interest,
            price,
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn len(&self) -> usize {
        self.interest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interest.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        self.interest.len() == self.price.len()
    }
}

/// Supplier of the two input series.
///
/// Gap filling and alignment are the source's job; the engine assumes one
/// row per period with no holes.
#[cfg_attr(test, mockall::automock)]
pub trait SeriesSource {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Load both series
    fn load(&self) -> Result<AlignedSeries, SourceError>;
}
