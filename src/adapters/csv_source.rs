//! CSV Series Source
//!
//! Reads the interest and price series from two headed CSV files and lines
//! them up by row position. No resampling or gap filling happens here: if the
//! files have different row counts the series come back misaligned and the
//! backtester rejects them.

use std::io;
use std::path::{Path, PathBuf};

use crate::ports::market_data::{AlignedSeries, SeriesSource, SourceError};

/// One named column in one CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvColumn {
    pub path: PathBuf,
    pub column: String,
}

impl CsvColumn {
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }
}

/// Series source backed by two CSV files
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    interest: CsvColumn,
    price: CsvColumn,
    /// Date column in the interest file
    label_column: Option<String>,
}

impl CsvSeriesSource {
    pub fn new(interest: CsvColumn, price: CsvColumn) -> Self {
        Self {
            interest,
            price,
            label_column: None,
        }
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = Some(column.into());
        self
    }
}

impl SeriesSource for CsvSeriesSource {
    fn describe(&self) -> String {
        format!(
            "{} [{}] + {} [{}]",
            self.interest.path.display(),
            self.interest.column,
            self.price.path.display(),
            self.price.column
        )
    }

    fn load(&self) -> Result<AlignedSeries, SourceError> {
        let mut interest_columns = vec![self.interest.column.as_str()];
        if let Some(label) = &self.label_column {
            interest_columns.push(label.as_str());
        }

        let mut from_interest = read_columns(&self.interest.path, &interest_columns)?;
        let labels = if self.label_column.is_some() {
            from_interest.pop()
        } else {
            None
        };
        let interest_raw = from_interest.pop().unwrap_or_default();
        let interest = parse_values(&self.interest.path, &self.interest.column, &interest_raw)?;

        let price_raw = read_columns(&self.price.path, &[self.price.column.as_str()])?
            .pop()
            .unwrap_or_default();
        let price = parse_values(&self.price.path, &self.price.column, &price_raw)?;

        if interest.len() != price.len() {
            tracing::warn!(
                interest = interest.len(),
                price = price.len(),
                "input files have different row counts"
            );
        }
        tracing::info!(rows = interest.len(), "loaded series from CSV");

        Ok(AlignedSeries {
            labels,
            interest,
            price,
        })
    }
}

/// Read the named columns from a headed CSV file, as raw text
pub fn read_columns(path: &Path, columns: &[&str]) -> Result<Vec<Vec<String>>, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_columns_from(file, &path.display().to_string(), columns)
}

/// Same as `read_columns` over any reader; `name` is used in errors
pub fn read_columns_from<R: io::Read>(
    reader: R,
    name: &str,
    columns: &[&str],
) -> Result<Vec<Vec<String>>, SourceError> {
    let read_err = |e: csv::Error| SourceError::Read {
        path: name.to_string(),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(read_err)?.clone();
    let indices = columns
        .iter()
        .map(|&column| {
            find_column(&headers, column).ok_or_else(|| SourceError::MissingColumn {
                path: name.to_string(),
                column: column.to_string(),
            })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let mut out: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
    for record in rdr.records() {
        let record = record.map_err(read_err)?;
        for (slot, &idx) in out.iter_mut().zip(&indices) {
            slot.push(record.get(idx).unwrap_or("").to_string());
        }
    }

    if out.first().map_or(true, Vec::is_empty) {
        return Err(SourceError::Empty(name.to_string()));
    }
    Ok(out)
}

/// Exact header match first, then case-insensitive
fn find_column(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(column)))
}

fn parse_values(path: &Path, column: &str, raw: &[String]) -> Result<Vec<f64>, SourceError> {
    raw.iter()
        .enumerate()
        .map(|(row, value)| {
            value.parse::<f64>().map_err(|_| SourceError::Parse {
                path: path.display().to_string(),
                // 1-based, header is row 1
                row: row + 2,
                column: column.to_string(),
                value: value.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_columns_from_reader() {
        let data = "Date,Adjusted\n2020-01-05, 10\n2020-01-12,12.5\n";
        let columns = read_columns_from(data.as_bytes(), "mem", &["Adjusted", "Date"]).unwrap();
        assert_eq!(columns[0], vec!["10", "12.5"]);
        assert_eq!(columns[1], vec!["2020-01-05", "2020-01-12"]);
    }

    #[test]
    fn test_case_insensitive_header() {
        let data = "date,close\n1,100\n";
        let columns = read_columns_from(data.as_bytes(), "mem", &["Close"]).unwrap();
        assert_eq!(columns[0], vec!["100"]);
    }

    #[test]
    fn test_missing_column() {
        let data = "Date,Adjusted\n1,2\n";
        let err = read_columns_from(data.as_bytes(), "mem", &["Close"]).unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { ref column, .. } if column == "Close"));
    }

    #[test]
    fn test_empty_file() {
        let err = read_columns_from("Date,Close\n".as_bytes(), "mem", &["Close"]).unwrap_err();
        assert_eq!(err, SourceError::Empty("mem".to_string()));
    }

    #[test]
    fn test_load_two_files() {
        let interest = csv_file("Date,Adjusted\nw1,10\nw2,10\nw3,10\nw4,20\n");
        let prices = csv_file("Date,Close\nw1,100\nw2,110\nw3,99\nw4,99\n");

        let source = CsvSeriesSource::new(
            CsvColumn::new(interest.path(), "Adjusted"),
            CsvColumn::new(prices.path(), "Close"),
        )
        .with_label_column("Date");

        let series = source.load().unwrap();
        assert_eq!(series.interest, vec![10.0, 10.0, 10.0, 20.0]);
        assert_eq!(series.price, vec![100.0, 110.0, 99.0, 99.0]);
        assert_eq!(
            series.labels,
            Some(vec!["w1".to_string(), "w2".to_string(), "w3".to_string(), "w4".to_string()])
        );
        assert!(series.is_aligned());
    }

    #[test]
    fn test_unparseable_value_reports_row() {
        let interest = csv_file("Adjusted\n10\nnull\n");
        let prices = csv_file("Close\n100\n101\n");
        let source = CsvSeriesSource::new(
            CsvColumn::new(interest.path(), "Adjusted"),
            CsvColumn::new(prices.path(), "Close"),
        );

        match source.load().unwrap_err() {
            SourceError::Parse { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "null");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unequal_files_pass_through() {
        let interest = csv_file("Adjusted\n1\n2\n3\n");
        let prices = csv_file("Close\n100\n101\n");
        let series = CsvSeriesSource::new(
            CsvColumn::new(interest.path(), "Adjusted"),
            CsvColumn::new(prices.path(), "Close"),
        )
        .load()
        .unwrap();
        assert!(!series.is_aligned());
    }

    #[test]
    fn test_missing_file() {
        let source = CsvSeriesSource::new(
            CsvColumn::new("/nonexistent/interest.csv", "Adjusted"),
            CsvColumn::new("/nonexistent/prices.csv", "Close"),
        );
        assert!(matches!(source.load(), Err(SourceError::Read { .. })));
    }
}
