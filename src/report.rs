//! Report Module
//! Console summaries of the dataset and the JSON record of a run.

use crate::charts::ChartKind;
use crate::data::columns::{column_names, float_values, numeric_columns};
use crate::data::{CleaningReport, DataSource};
use crate::stats::{ColumnSummary, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the run summary inside the output directory
pub const SUMMARY_FILE: &str = "analysis_summary.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNulls {
    pub column: String,
    pub nulls: usize,
}

/// Per-column null counts, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MissingValues {
    counts: Vec<ColumnNulls>,
}

impl MissingValues {
    /// Snapshot the null counts of every column.
    pub fn capture(df: &DataFrame) -> Self {
        let counts = df
            .get_columns()
            .iter()
            .map(|col| ColumnNulls {
                column: col.name().to_string(),
                nulls: col.null_count(),
            })
            .collect();
        Self { counts }
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.nulls)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.nulls).sum()
    }

    pub fn print(&self) {
        let width = self.counts.iter().map(|c| c.column.len()).max().unwrap_or(0);
        for c in &self.counts {
            println!("{:<width$}  {}", c.column, c.nulls, width = width);
        }
        println!("{:<width$}  {}", "(total)", self.total(), width = width);
    }
}

/// Print the shape and the first `preview_rows` rows.
pub fn print_overview(df: &DataFrame, preview_rows: usize) {
    println!("Dataset Shape: ({}, {})", df.height(), df.width());
    println!("\n--- First {} Rows ---", preview_rows);
    println!("{}", df.head(Some(preview_rows)));
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NamedSummary {
    pub column: String,
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

/// Describe every numeric column, nulls ignored.
pub fn numeric_summary(df: &DataFrame) -> Result<Vec<NamedSummary>, ReportError> {
    numeric_columns(df)
        .into_iter()
        .map(|column| -> Result<NamedSummary, ReportError> {
            let values: Vec<f64> = float_values(df, &column)?.into_iter().flatten().collect();
            Ok(NamedSummary {
                summary: StatsCalculator::compute_descriptive_stats(&values),
                column,
            })
        })
        .collect()
}

pub fn print_numeric_summary(summaries: &[NamedSummary]) {
    let width = summaries
        .iter()
        .map(|s| s.column.len())
        .max()
        .unwrap_or(0)
        .max(6);
    println!(
        "{:<width$} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
        width = width
    );
    for s in summaries {
        let v = &s.summary;
        println!(
            "{:<width$} {:>6} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            s.column, v.count, v.mean, v.std, v.min, v.p25, v.median, v.p75, v.max,
            width = width
        );
    }
}

/// One presented chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRecord {
    pub kind: ChartKind,
    pub title: String,
    pub file: Option<PathBuf>,
}

/// Everything a run produced, written as JSON next to the charts.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub source: DataSource,
    pub rows: usize,
    pub columns: Vec<String>,
    pub missing_before_cleaning: MissingValues,
    pub cleaning: CleaningReport,
    pub numeric_summary: Vec<NamedSummary>,
    pub charts: Vec<ChartRecord>,
}

impl AnalysisSummary {
    pub fn new(
        source: DataSource,
        dataset: &DataFrame,
        missing_before_cleaning: MissingValues,
        cleaning: CleaningReport,
        numeric_summary: Vec<NamedSummary>,
        charts: Vec<ChartRecord>,
    ) -> Self {
        Self {
            source,
            rows: dataset.height(),
            columns: column_names(dataset),
            missing_before_cleaning,
            cleaning,
            numeric_summary,
            charts,
        }
    }

    /// Write the summary as pretty JSON into `dir`, creating it if needed.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(SUMMARY_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
