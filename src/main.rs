//! Titanic EDA - passenger dataset cleaning & exploratory charts
//!
//! Loads the Titanic training data, reports missing values, imputes and drops
//! them, then writes five descriptive charts and a JSON run summary.

mod charts;
mod config;
mod data;
mod pipeline;
mod report;
mod stats;

use anyhow::{Context, Result};
use charts::PngChartSink;
use config::AnalysisConfig;
use data::HttpSource;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::default();
    let remote = HttpSource::new(config.http_timeout).context("building HTTP client")?;
    let mut sink = PngChartSink::new(&config.output_dir).context("preparing chart output")?;

    pipeline::run(&config, &remote, &mut sink)?;
    Ok(())
}
