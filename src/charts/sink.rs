//! Chart Sinks
//! Output surfaces that charts are presented to, in order.

use crate::charts::{Chart, ChartError, StaticChartRenderer};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Receives each produced chart synchronously.
pub trait ChartSink {
    /// Present one chart, returning where it was written if anywhere.
    fn present(&mut self, chart: &Chart) -> Result<Option<PathBuf>, ChartError>;
}

/// Writes every chart as a numbered PNG image.
pub struct PngChartSink {
    output_dir: PathBuf,
}

impl PngChartSink {
    pub fn new(output_dir: &Path) -> Result<Self, ChartError> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// File a chart is written to, e.g. `01_survival_count.png`.
    pub fn chart_path(&self, chart: &Chart) -> PathBuf {
        self.output_dir.join(format!(
            "{:02}_{}.png",
            chart.kind.number(),
            chart.kind.file_stem()
        ))
    }
}

impl ChartSink for PngChartSink {
    fn present(&mut self, chart: &Chart) -> Result<Option<PathBuf>, ChartError> {
        let image = StaticChartRenderer::render(chart)?;
        let path = self.chart_path(chart);
        image.save(&path)?;

        info!("wrote {}x{} chart to {}", chart.size.0, chart.size.1, path.display());
        println!("Chart '{}' saved to {}", chart.title, path.display());
        Ok(Some(path))
    }
}

/// Keeps presented charts in memory.
#[cfg(test)]
#[derive(Default)]
pub struct CollectingSink {
    pub charts: Vec<Chart>,
}

#[cfg(test)]
impl ChartSink for CollectingSink {
    fn present(&mut self, chart: &Chart) -> Result<Option<PathBuf>, ChartError> {
        self.charts.push(chart.clone());
        Ok(None)
    }
}
