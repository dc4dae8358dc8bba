//! Chart Plotter Module
//! Turns the cleaned dataset into the five fixed EDA chart models. A chart
//! whose columns are missing is skipped.

use crate::charts::palette::Palette;
use crate::charts::ChartError;
use crate::data::columns::{
    categories, float_values, has_columns, numeric_columns, string_values,
};
use crate::stats::{HistogramBin, StatsCalculator};
use log::debug;
use polars::prelude::*;
use serde::Serialize;

/// Points sampled along the density overlay
const DENSITY_POINTS: usize = 200;

/// The five charts, in presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SurvivalCount,
    SurvivalByGender,
    SurvivalByClass,
    AgeDistribution,
    CorrelationMatrix,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::SurvivalCount,
        ChartKind::SurvivalByGender,
        ChartKind::SurvivalByClass,
        ChartKind::AgeDistribution,
        ChartKind::CorrelationMatrix,
    ];

    /// 1-based position in the presentation order.
    pub fn number(self) -> usize {
        match self {
            ChartKind::SurvivalCount => 1,
            ChartKind::SurvivalByGender => 2,
            ChartKind::SurvivalByClass => 3,
            ChartKind::AgeDistribution => 4,
            ChartKind::CorrelationMatrix => 5,
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::SurvivalCount => "survival_count",
            ChartKind::SurvivalByGender => "survival_by_gender",
            ChartKind::SurvivalByClass => "survival_by_class",
            ChartKind::AgeDistribution => "age_distribution",
            ChartKind::CorrelationMatrix => "correlation_matrix",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::SurvivalCount => "Distribution of Survival (0 = No, 1 = Yes)",
            ChartKind::SurvivalByGender => "Survival Rate by Gender",
            ChartKind::SurvivalByClass => "Survival Rate by Passenger Class",
            ChartKind::AgeDistribution => "Age Distribution",
            ChartKind::CorrelationMatrix => "Correlation Matrix",
        }
    }

    /// Figure size in pixels
    pub fn size(self) -> (u32, u32) {
        match self {
            ChartKind::SurvivalCount | ChartKind::SurvivalByGender | ChartKind::SurvivalByClass => {
                (600, 400)
            }
            ChartKind::AgeDistribution => (800, 500),
            ChartKind::CorrelationMatrix => (800, 600),
        }
    }

    /// Columns that must exist for the chart to be drawn. The heatmap is
    /// gated on having any numeric column instead.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            ChartKind::SurvivalCount => &["Survived"],
            ChartKind::SurvivalByGender => &["Survived", "Sex"],
            ChartKind::SurvivalByClass => &["Survived", "Pclass"],
            ChartKind::AgeDistribution => &["Age"],
            ChartKind::CorrelationMatrix => &[],
        }
    }
}

/// Bars for one hue level (or all bars when there is no hue).
#[derive(Debug, Clone, PartialEq)]
pub struct CountSeries {
    pub label: Option<String>,
    pub counts: Vec<usize>,
}

/// Count plot: occurrences of each category, optionally split by a hue column.
#[derive(Debug, Clone, PartialEq)]
pub struct CountChart {
    pub x_column: String,
    pub hue_column: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<CountSeries>,
    pub palette: Palette,
}

/// Histogram with a density curve scaled to counts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub density: Vec<(f64, f64)>,
}

/// Square matrix of annotated cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Count(CountChart),
    Histogram(HistogramChart),
    Heatmap(HeatmapChart),
}

/// A fully computed chart, ready for a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub size: (u32, u32),
    pub body: ChartBody,
}

impl Chart {
    fn new(kind: ChartKind, body: ChartBody) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            size: kind.size(),
            body,
        }
    }
}

/// Builds the chart models from a dataset.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Build every chart whose columns are present, in presentation order.
    pub fn build_all(df: &DataFrame, histogram_bins: usize) -> Result<Vec<Chart>, ChartError> {
        let mut charts = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            match Self::build(df, kind, histogram_bins)? {
                Some(chart) => charts.push(chart),
                None => debug!("skipping '{}': required columns missing", kind.title()),
            }
        }
        Ok(charts)
    }

    /// Build a single chart, `None` when it is gated out.
    pub fn build(
        df: &DataFrame,
        kind: ChartKind,
        histogram_bins: usize,
    ) -> Result<Option<Chart>, ChartError> {
        if !has_columns(df, kind.required_columns()) {
            return Ok(None);
        }

        let body = match kind {
            ChartKind::SurvivalCount => {
                ChartBody::Count(Self::count_chart(df, "Survived", None, Palette::Pastel)?)
            }
            ChartKind::SurvivalByGender => {
                ChartBody::Count(Self::count_chart(df, "Survived", Some("Sex"), Palette::Set1)?)
            }
            ChartKind::SurvivalByClass => {
                ChartBody::Count(Self::count_chart(df, "Pclass", Some("Survived"), Palette::Set2)?)
            }
            ChartKind::AgeDistribution => {
                ChartBody::Histogram(Self::histogram_chart(df, "Age", histogram_bins)?)
            }
            ChartKind::CorrelationMatrix => match Self::heatmap_chart(df)? {
                Some(heatmap) => ChartBody::Heatmap(heatmap),
                None => return Ok(None),
            },
        };

        Ok(Some(Chart::new(kind, body)))
    }

    /// Count rows per category of `x`, one series per level of `hue`.
    pub fn count_chart(
        df: &DataFrame,
        x: &str,
        hue: Option<&str>,
        palette: Palette,
    ) -> Result<CountChart, ChartError> {
        let xs = string_values(df, x)?;
        let x_categories = categories(&xs);

        let count_where = |keep: &dyn Fn(usize) -> bool| -> Vec<usize> {
            x_categories
                .iter()
                .map(|category| {
                    xs.iter()
                        .enumerate()
                        .filter(|(i, v)| v.as_deref() == Some(category.as_str()) && keep(*i))
                        .count()
                })
                .collect()
        };

        let series = match hue {
            None => vec![CountSeries {
                label: None,
                counts: count_where(&|_: usize| true),
            }],
            Some(hue) => {
                let hues = string_values(df, hue)?;
                categories(&hues)
                    .into_iter()
                    .map(|level| {
                        let counts =
                            count_where(&|i: usize| hues[i].as_deref() == Some(level.as_str()));
                        CountSeries {
                            label: Some(level),
                            counts,
                        }
                    })
                    .collect()
            }
        };

        Ok(CountChart {
            x_column: x.to_string(),
            hue_column: hue.map(str::to_string),
            categories: x_categories,
            series,
            palette,
        })
    }

    /// Histogram of a numeric column with a density overlay.
    pub fn histogram_chart(
        df: &DataFrame,
        column: &str,
        bins: usize,
    ) -> Result<HistogramChart, ChartError> {
        let values: Vec<f64> = float_values(df, column)?.into_iter().flatten().collect();
        let bins = StatsCalculator::histogram(&values, bins);

        let density = match bins.first() {
            Some(bin) => {
                let scale = values.len() as f64 * (bin.upper - bin.lower);
                StatsCalculator::kernel_density(&values, DENSITY_POINTS, scale)
            }
            None => Vec::new(),
        };

        Ok(HistogramChart {
            column: column.to_string(),
            bins,
            density,
        })
    }

    /// Correlation heatmap over all numeric columns, `None` without any
    /// numeric column or without rows.
    pub fn heatmap_chart(df: &DataFrame) -> Result<Option<HeatmapChart>, ChartError> {
        let labels = numeric_columns(df);
        if labels.is_empty() || df.height() == 0 {
            return Ok(None);
        }

        let columns = labels
            .iter()
            .map(|name| float_values(df, name))
            .collect::<PolarsResult<Vec<_>>>()?;
        let matrix = StatsCalculator::correlation_matrix(&columns);

        Ok(Some(HeatmapChart { labels, matrix }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{mock_dataset, DataProcessor};

    fn cleaned_mock() -> DataFrame {
        let mut df = mock_dataset().unwrap();
        DataProcessor::clean(&mut df).unwrap();
        df
    }

    fn kinds(charts: &[Chart]) -> Vec<ChartKind> {
        charts.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn all_five_charts_in_order() {
        let charts = ChartPlotter::build_all(&cleaned_mock(), 30).unwrap();
        assert_eq!(kinds(&charts), ChartKind::ALL.to_vec());
    }

    #[test]
    fn missing_age_skips_histogram_only() {
        let mut df = cleaned_mock();
        df.drop_in_place("Age").unwrap();

        let charts = ChartPlotter::build_all(&df, 30).unwrap();
        assert_eq!(charts.len(), 4);
        assert!(!kinds(&charts).contains(&ChartKind::AgeDistribution));
    }

    #[test]
    fn no_numeric_columns_skips_heatmap() {
        let df = DataFrame::new(vec![Column::new("Sex".into(), ["male", "female"])]).unwrap();
        let charts = ChartPlotter::build_all(&df, 30).unwrap();
        assert!(charts.is_empty());
    }

    #[test]
    fn survival_count_bars() {
        let chart = ChartPlotter::count_chart(&cleaned_mock(), "Survived", None, Palette::Pastel)
            .unwrap();
        assert_eq!(chart.categories, vec!["0", "1"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, None);
        assert_eq!(chart.series[0].counts, vec![3, 2]);
    }

    #[test]
    fn survival_by_gender_splits_by_hue() {
        let chart =
            ChartPlotter::count_chart(&cleaned_mock(), "Survived", Some("Sex"), Palette::Set1)
                .unwrap();
        assert_eq!(chart.hue_column.as_deref(), Some("Sex"));
        let female = &chart.series[0];
        let male = &chart.series[1];
        assert_eq!(female.label.as_deref(), Some("female"));
        assert_eq!(female.counts, vec![0, 2]);
        assert_eq!(male.label.as_deref(), Some("male"));
        assert_eq!(male.counts, vec![3, 0]);
    }

    #[test]
    fn survival_by_class_counts() {
        let chart =
            ChartPlotter::count_chart(&cleaned_mock(), "Pclass", Some("Survived"), Palette::Set2)
                .unwrap();
        assert_eq!(chart.categories, vec!["1", "3"]);
        assert_eq!(chart.series[0].counts, vec![1, 2]);
        assert_eq!(chart.series[1].counts, vec![1, 1]);
    }

    #[test]
    fn age_histogram_has_thirty_bins() {
        let chart = ChartPlotter::histogram_chart(&cleaned_mock(), "Age", 30).unwrap();
        assert_eq!(chart.bins.len(), 30);
        assert_eq!(chart.bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(chart.bins[0].lower, 22.0);
        assert_eq!(chart.density.len(), DENSITY_POINTS);
    }

    #[test]
    fn heatmap_covers_numeric_columns() {
        let heatmap = ChartPlotter::heatmap_chart(&cleaned_mock()).unwrap().unwrap();
        assert_eq!(heatmap.labels, vec!["Survived", "Pclass", "Age", "Fare"]);
        assert_eq!(heatmap.matrix.len(), 4);
        for (i, row) in heatmap.matrix.iter().enumerate() {
            assert_eq!(row.len(), 4);
            assert_eq!(row[i], 1.0);
        }
        // First class paid more.
        assert!(heatmap.matrix[1][3] < -0.9);
    }

    #[test]
    fn no_rows_left_skips_heatmap() {
        let mut df = DataFrame::new(vec![
            Column::new("Survived".into(), [0i64, 1]),
            Column::new("Age".into(), [None::<f64>, None]),
        ])
        .unwrap();
        DataProcessor::clean(&mut df).unwrap();
        assert_eq!(df.height(), 0);

        assert!(ChartPlotter::heatmap_chart(&df).unwrap().is_none());
        let charts = ChartPlotter::build_all(&df, 30).unwrap();
        assert_eq!(
            kinds(&charts),
            vec![ChartKind::SurvivalCount, ChartKind::AgeDistribution]
        );
    }
}
