//! Statistics module - descriptive stats, correlation and density estimation

mod calculator;

pub use calculator::{ColumnSummary, HistogramBin, StatsCalculator};
