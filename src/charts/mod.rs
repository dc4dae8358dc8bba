//! Charts module - chart models, rendering and output sinks

mod palette;
mod plotter;
mod renderer;
mod sink;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use plotter::{
    Chart, ChartBody, ChartKind, ChartPlotter, CountChart, HeatmapChart, HistogramChart,
};
pub use renderer::StaticChartRenderer;
#[cfg(test)]
pub use sink::CollectingSink;
pub use sink::{ChartSink, PngChartSink};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
