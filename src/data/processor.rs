//! Data Processor Module
//! Handles missing-value cleaning of the passenger table.

use crate::data::columns::{float_values, has_column, string_values};
use crate::stats::StatsCalculator;
use log::{debug, warn};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub const AGE: &str = "Age";
pub const EMBARKED: &str = "Embarked";
pub const CABIN: &str = "Cabin";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// What the cleaning pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub age_median: Option<f64>,
    pub embarked_mode: Option<String>,
    pub cabin_dropped: bool,
    pub rows_before: usize,
    pub rows_dropped: usize,
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Clean the dataset in place.
    ///
    /// Order: median-fill `Age`, mode-fill `Embarked`, drop `Cabin`, then drop
    /// every row that still has a null. Each column step only runs when the
    /// column exists.
    pub fn clean(df: &mut DataFrame) -> Result<CleaningReport, ProcessorError> {
        let rows_before = df.height();

        let age_median = if has_column(df, AGE) {
            Self::fill_with_median(df, AGE)?
        } else {
            None
        };

        let embarked_mode = if has_column(df, EMBARKED) {
            Self::fill_with_mode(df, EMBARKED)?
        } else {
            None
        };

        let cabin_dropped = has_column(df, CABIN);
        if cabin_dropped {
            df.drop_in_place(CABIN)?;
            println!("Dropped '{}' column.", CABIN);
        }

        *df = df.drop_nulls::<String>(None)?;
        let rows_dropped = rows_before - df.height();
        debug!("null-row pass removed {} of {} rows", rows_dropped, rows_before);

        Ok(CleaningReport {
            age_median,
            embarked_mode,
            cabin_dropped,
            rows_before,
            rows_dropped,
        })
    }

    /// Replace nulls with the median of the observed values.
    ///
    /// A column without any observed value has no median; it is left as is.
    pub fn fill_with_median(df: &mut DataFrame, name: &str) -> Result<Option<f64>, ProcessorError> {
        let values = float_values(df, name)?;
        let observed: Vec<f64> = values.iter().flatten().copied().collect();

        let Some(median) = StatsCalculator::median(&observed) else {
            warn!("'{}' has no values, skipping median fill", name);
            return Ok(None);
        };

        let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(median)).collect();
        df.with_column(Column::new(name.into(), filled))?;
        println!("Filled missing '{}' values with median: {:?}", name, median);

        Ok(Some(median))
    }

    /// Replace nulls with the most frequent observed value.
    pub fn fill_with_mode(df: &mut DataFrame, name: &str) -> Result<Option<String>, ProcessorError> {
        let values = string_values(df, name)?;

        let Some(mode) = StatsCalculator::mode(values.iter().flatten().map(String::as_str)) else {
            warn!("'{}' has no values, skipping mode fill", name);
            return Ok(None);
        };

        let filled: Vec<String> = values
            .into_iter()
            .map(|v| v.unwrap_or_else(|| mode.clone()))
            .collect();
        df.with_column(Column::new(name.into(), filled))?;
        println!("Filled missing '{}' values with mode: {}", name, mode);

        Ok(Some(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::column_names;
    use crate::data::mock_dataset;

    fn titanic_like() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Survived".into(), [0i64, 1, 1, 0, 0, 1]),
            Column::new(
                "Age".into(),
                [Some(22.0), Some(38.0), Some(26.0), Some(35.0), None, Some(30.0)],
            ),
            Column::new(
                "Cabin".into(),
                [None, Some("C85"), None, Some("C123"), None, None],
            ),
            Column::new(
                "Embarked".into(),
                [Some("S"), Some("C"), Some("S"), Some("S"), Some("Q"), None],
            ),
            Column::new(
                "Fare".into(),
                [Some(7.25), Some(71.28), None, Some(53.1), Some(8.05), Some(8.46)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn no_nulls_remain() {
        let mut df = titanic_like();
        DataProcessor::clean(&mut df).unwrap();
        for column in df.get_columns() {
            assert_eq!(column.null_count(), 0, "column {}", column.name());
        }
    }

    #[test]
    fn report_describes_each_step() {
        let mut df = titanic_like();
        let report = DataProcessor::clean(&mut df).unwrap();

        assert_eq!(report.age_median, Some(30.0));
        assert_eq!(report.embarked_mode.as_deref(), Some("S"));
        assert!(report.cabin_dropped);
        assert_eq!(report.rows_before, 6);
        // Only the null Fare row is left for the final pass.
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn cabin_is_removed_and_order_kept() {
        let mut df = titanic_like();
        DataProcessor::clean(&mut df).unwrap();
        assert_eq!(column_names(&df), vec!["Survived", "Age", "Embarked", "Fare"]);
    }

    #[test]
    fn median_fills_missing_age() {
        let mut df = mock_dataset().unwrap();
        let median = DataProcessor::fill_with_median(&mut df, AGE).unwrap();
        assert_eq!(median, Some(30.5));
        assert_eq!(
            float_values(&df, AGE).unwrap(),
            vec![Some(22.0), Some(38.0), Some(26.0), Some(35.0), Some(30.5)]
        );
    }

    #[test]
    fn mode_fills_missing_embarked() {
        let mut df = titanic_like();
        let mode = DataProcessor::fill_with_mode(&mut df, EMBARKED).unwrap();
        assert_eq!(mode.as_deref(), Some("S"));
        assert_eq!(string_values(&df, EMBARKED).unwrap()[5].as_deref(), Some("S"));
    }

    #[test]
    fn all_null_age_is_not_imputed() {
        let mut df = DataFrame::new(vec![
            Column::new("Survived".into(), [0i64, 1]),
            Column::new("Age".into(), [None::<f64>, None]),
        ])
        .unwrap();

        let report = DataProcessor::clean(&mut df).unwrap();
        assert_eq!(report.age_median, None);
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn missing_columns_are_skipped() {
        let mut df = DataFrame::new(vec![Column::new("Fare".into(), [1.0, 2.0])]).unwrap();
        let report = DataProcessor::clean(&mut df).unwrap();
        assert_eq!(
            report,
            CleaningReport {
                rows_before: 2,
                ..CleaningReport::default()
            }
        );
        assert_eq!(df.height(), 2);
    }
}
