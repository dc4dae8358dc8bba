//! Analysis Pipeline
//! Load → report → clean → describe → chart, with the dataset passed
//! explicitly from stage to stage.

use crate::charts::{ChartPlotter, ChartSink};
use crate::config::AnalysisConfig;
use crate::data::{load_dataset, CleaningReport, DataProcessor, LoadedDataset, RemoteSource};
use crate::report::{self, AnalysisSummary, ChartRecord, MissingValues, NamedSummary};
use anyhow::{Context, Result};
use log::info;
use polars::prelude::DataFrame;

/// Results of analysing one dataset.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub dataset: DataFrame,
    pub missing_before_cleaning: MissingValues,
    pub cleaning: CleaningReport,
    pub numeric_summary: Vec<NamedSummary>,
    pub charts: Vec<ChartRecord>,
}

/// Report, clean and chart an already loaded dataset.
pub fn analyze(
    mut dataset: DataFrame,
    config: &AnalysisConfig,
    sink: &mut dyn ChartSink,
) -> Result<AnalysisOutcome> {
    report::print_overview(&dataset, config.preview_rows);

    println!("\n--- Missing Values Before Cleaning ---");
    let missing_before_cleaning = MissingValues::capture(&dataset);
    missing_before_cleaning.print();

    println!("\n--- Starting Data Cleaning ---");
    let cleaning = DataProcessor::clean(&mut dataset).context("cleaning dataset")?;
    println!(
        "Rows after cleaning: {} ({} dropped)",
        dataset.height(),
        cleaning.rows_dropped
    );

    println!("\n--- Numeric Summary After Cleaning ---");
    let numeric_summary = report::numeric_summary(&dataset).context("describing dataset")?;
    report::print_numeric_summary(&numeric_summary);

    println!("\n--- Starting EDA ---");
    let charts = ChartPlotter::build_all(&dataset, config.histogram_bins)
        .context("building charts")?;
    info!("{} of 5 charts available", charts.len());

    let mut records = Vec::with_capacity(charts.len());
    for chart in &charts {
        let file = sink
            .present(chart)
            .with_context(|| format!("presenting chart '{}'", chart.title))?;
        records.push(ChartRecord {
            kind: chart.kind,
            title: chart.title.clone(),
            file,
        });
    }

    Ok(AnalysisOutcome {
        dataset,
        missing_before_cleaning,
        cleaning,
        numeric_summary,
        charts: records,
    })
}

/// Full run: load the dataset, analyse it and write the JSON summary.
pub fn run(
    config: &AnalysisConfig,
    remote: &dyn RemoteSource,
    sink: &mut dyn ChartSink,
) -> Result<AnalysisSummary> {
    println!("--- Data Loading Phase ---");
    let LoadedDataset { frame, source } =
        load_dataset(config, remote).context("building fallback dataset")?;

    let outcome = analyze(frame, config, sink)?;
    let summary = AnalysisSummary::new(
        source,
        &outcome.dataset,
        outcome.missing_before_cleaning,
        outcome.cleaning,
        outcome.numeric_summary,
        outcome.charts,
    );

    let path = summary
        .write_json(&config.output_dir)
        .context("writing analysis summary")?;
    println!("\nSummary written to {}", path.display());
    println!("\n--- Analysis Complete ---");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, CollectingSink};
    use crate::data::columns::float_values;
    use crate::data::{mock_dataset, DataSource, LoaderError};
    use crate::report::SUMMARY_FILE;

    struct Offline;

    impl RemoteSource for Offline {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, LoaderError> {
            Err(LoaderError::Status(404))
        }
    }

    fn config_in(dir: &tempfile::TempDir) -> AnalysisConfig {
        AnalysisConfig {
            local_path: dir.path().join("missing.csv"),
            output_dir: dir.path().join("eda_output"),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn mock_dataset_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CollectingSink::default();

        let outcome = analyze(mock_dataset().unwrap(), &config_in(&dir), &mut sink).unwrap();

        assert_eq!(outcome.missing_before_cleaning.get("Age"), Some(1));
        assert_eq!(outcome.dataset.column("Age").unwrap().null_count(), 0);
        let ages = float_values(&outcome.dataset, "Age").unwrap();
        assert_eq!(ages[4], Some(30.5));
        assert_eq!(outcome.cleaning.age_median, Some(30.5));
        assert_eq!(outcome.dataset.height(), 5);

        let kinds: Vec<ChartKind> = sink.charts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        assert_eq!(outcome.charts.len(), 5);
    }

    #[test]
    fn no_nulls_after_cleaning() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CollectingSink::default();
        let outcome = analyze(mock_dataset().unwrap(), &config_in(&dir), &mut sink).unwrap();
        for column in outcome.dataset.get_columns() {
            assert_eq!(column.null_count(), 0, "column {}", column.name());
        }
    }

    #[test]
    fn dataset_without_age_gets_four_charts() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = mock_dataset().unwrap();
        df.drop_in_place("Age").unwrap();
        let mut sink = CollectingSink::default();

        let outcome = analyze(df, &config_in(&dir), &mut sink).unwrap();

        assert_eq!(sink.charts.len(), 4);
        assert!(sink.charts.iter().all(|c| c.kind != ChartKind::AgeDistribution));
        assert_eq!(outcome.cleaning.age_median, None);
    }

    #[test]
    fn offline_run_uses_mock_data_and_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut sink = CollectingSink::default();

        let summary = run(&config, &Offline, &mut sink).unwrap();

        assert!(matches!(summary.source, DataSource::Mock { .. }));
        assert_eq!(summary.rows, 5);
        assert_eq!(
            summary.columns,
            vec!["Survived", "Pclass", "Sex", "Age", "Fare", "Embarked"]
        );
        assert_eq!(summary.charts.len(), 5);
        assert!(config.output_dir.join(SUMMARY_FILE).is_file());
    }
}
