//! Report Writers
//!
//! Text summary for the terminal, JSON export of the headline figures and a
//! per-period CSV of both equity curves.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::application::BacktestReport;
use crate::domain::{PerformanceSummary, TimeStepRecord};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Round to one decimal place for display
fn pct(value: f64) -> String {
    format!("{:.1} %", value)
}

/// Human-readable summary of one run
pub fn format_summary(report: &BacktestReport) -> String {
    let s = &report.summary;
    let lines = [
        format!(
            "Strategy: {} ({}, window {})",
            report.strategy, report.config.polarity, report.config.window_size
        ),
        format!(
            "Periods: {} ({:.1} years at {} per year)",
            s.periods,
            s.years(),
            s.periods_per_year
        ),
        format!("Signals: {} long / {} short", s.long_count, s.short_count),
        String::new(),
        format!("Annualised Buy-and-Hold Return: {}", pct(s.benchmark_annualized_return_pct)),
        format!("Accuracy: {}", pct(s.accuracy_pct)),
        format!("Total Return: {}", pct(s.strategy_total_return_pct)),
        format!("Annualised Strategy Return: {}", pct(s.strategy_annualized_return_pct)),
        format!("Excess Annualised Return: {}", pct(s.excess_annualized_return_pct())),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Per-step table of baseline, deviation and signal, warm-up included
pub fn format_signal_table(records: &[TimeStepRecord]) -> String {
    let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v));

    let mut out = format!(
        "{:>6} {:>12} {:>10} {:>12} {:>10} {:>10} {:>6}\n",
        "step", "label", "interest", "price", "baseline", "deviation", "signal"
    );
    for r in records {
        out.push_str(&format!(
            "{:>6} {:>12} {:>10.3} {:>12.3} {:>10} {:>10} {:>6}\n",
            r.step,
            r.label.as_deref().unwrap_or("-"),
            r.interest,
            r.price,
            fmt_opt(r.baseline),
            fmt_opt(r.deviation),
            r.signal.map_or_else(|| "-".to_string(), |s| s.to_string()),
        ));
    }
    out
}

/// Write the summary as pretty JSON
pub fn write_summary_json(path: &Path, summary: &PerformanceSummary) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Debug, Serialize)]
struct EquityRow<'a> {
    step: usize,
    label: Option<&'a str>,
    signal: Option<String>,
    period_return: Option<f64>,
    strategy: f64,
    benchmark: f64,
}

/// Write one row per simulated period with both equity values
pub fn write_equity_csv(path: &Path, report: &BacktestReport) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let curves = report
        .result
        .strategy_curve
        .iter()
        .zip(&report.result.benchmark_curve);
    for (record, (&strategy, &benchmark)) in report.records.iter().zip(curves) {
        writer.serialize(EquityRow {
            step: record.step,
            label: record.label.as_deref(),
            signal: record.signal.map(|s| s.to_string()),
            period_return: record.period_return,
            strategy,
            benchmark,
        })?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = report.records.len(), "wrote equity curve");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Backtester;
    use crate::ports::AlignedSeries;
    use crate::strategy::BacktestConfig;
    use tempfile::tempdir;

    fn sample_report() -> BacktestReport {
        let series = AlignedSeries::new(
            vec![10.0, 10.0, 10.0, 10.0, 20.0, 10.0],
            vec![100.0, 101.0, 102.0, 100.0, 110.0, 99.0],
        )
        .with_labels((1..=6).map(|w| format!("w{}", w)).collect());
        Backtester::with_trend_strategy(BacktestConfig::default())
            .run(&series)
            .unwrap()
    }

    #[test]
    fn test_format_summary() {
        let text = format_summary(&sample_report());
        assert!(text.contains("Annualised Buy-and-Hold Return:"));
        assert!(text.contains("Accuracy:"));
        assert!(text.contains("Periods: 3"));
        assert!(text.contains("momentum"));
    }

    #[test]
    fn test_format_signal_table() {
        let report = sample_report();
        let table = format_signal_table(&report.records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 1 + report.records.len());
        assert!(lines[1].contains("SHORT"));
        assert!(lines[2].contains("LONG"));
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let report = sample_report();

        write_summary_json(&path, &report.summary).unwrap();
        let back: PerformanceSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, report.summary);
    }

    #[test]
    fn test_summary_json_is_lossless() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let mut rng = StdRng::seed_from_u64(17);
        let mut summary = sample_report().summary;

        for _ in 0..500 {
            summary.strategy_final_equity = rng.gen_range(1e-3..1e4);
            summary.strategy_total_return_pct = rng.gen_range(-100.0..1e3);
            summary.strategy_annualized_return_pct = rng.gen_range(-100.0..1e3);
            summary.benchmark_annualized_return_pct = rng.gen_range(-100.0..1e3);
            summary.accuracy_pct = rng.gen_range(0.0..100.0);

            write_summary_json(&path, &summary).unwrap();
            let back: PerformanceSummary =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(back, summary);
        }
    }

    #[test]
    fn test_write_equity_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        let report = sample_report();

        write_equity_csv(&path, &report).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "step,label,signal,period_return,strategy,benchmark");
        assert_eq!(lines.len(), 1 + report.records.len());
        assert!(lines[1].starts_with("3,w4,SHORT,"));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let report = sample_report();
        let result = write_equity_csv(Path::new("/nonexistent/dir/equity.csv"), &report);
        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
