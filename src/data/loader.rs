//! Dataset Loader Module
//! Loads the passenger CSV from the local cache, the remote URL, or falls
//! back to a small built-in mock dataset.

use crate::config::AnalysisConfig;
use log::{debug, info, warn};
use polars::prelude::*;
use serde::Serialize;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read local file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error("No data loaded")]
    NoData,
}

/// Where the loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Local { path: PathBuf },
    Remote { url: String },
    Mock { reason: String },
}

/// A freshly loaded dataset together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub frame: DataFrame,
    pub source: DataSource,
}

/// Fetches the raw bytes of a remote CSV.
pub trait RemoteSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError>;
}

/// Blocking HTTP download with a bounded timeout.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl RemoteSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status(status.as_u16()));
        }
        let body = response.bytes()?;
        debug!("received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Parse comma-separated text with a header row.
pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    if df.width() == 0 {
        return Err(LoaderError::NoData);
    }
    Ok(df)
}

/// Load from the local file if it exists, otherwise from the remote URL.
/// Every failure is surfaced as a distinct [`LoaderError`].
pub fn try_load(
    config: &AnalysisConfig,
    remote: &dyn RemoteSource,
) -> Result<LoadedDataset, LoaderError> {
    let path = &config.local_path;

    if path.exists() {
        println!("Success: Found local file '{}'", path.display());
        let bytes = std::fs::read(path)?;
        let frame = parse_csv(bytes)?;
        info!("loaded {} rows from {}", frame.height(), path.display());
        return Ok(LoadedDataset {
            frame,
            source: DataSource::Local { path: path.clone() },
        });
    }

    println!(
        "Notice: Local file '{}' not found. Attempting to download from web...",
        path.display()
    );
    let body = remote.fetch(&config.remote_url)?;
    let text = String::from_utf8(body)?;
    let frame = parse_csv(text.into_bytes())?;
    println!("Success: Data downloaded from URL.");
    info!("downloaded {} rows from {}", frame.height(), config.remote_url);

    Ok(LoadedDataset {
        frame,
        source: DataSource::Remote {
            url: config.remote_url.clone(),
        },
    })
}

/// Load the dataset, replacing any loading failure with [`mock_dataset`].
///
/// Only building the mock frame itself can fail here.
pub fn load_dataset(
    config: &AnalysisConfig,
    remote: &dyn RemoteSource,
) -> Result<LoadedDataset, LoaderError> {
    let error = match try_load(config, remote) {
        Ok(loaded) => return Ok(loaded),
        Err(e) => e,
    };

    println!("Error loading data: {}", error);
    println!("Falling back to small Mock Data for demonstration.");
    warn!("dataset unavailable, using mock rows: {}", error);

    Ok(LoadedDataset {
        frame: mock_dataset()?,
        source: DataSource::Mock {
            reason: error.to_string(),
        },
    })
}

/// Five hand-written passengers used when no real data can be loaded.
pub fn mock_dataset() -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new("Survived".into(), [0i64, 1, 1, 0, 0]),
        Column::new("Pclass".into(), [3i64, 1, 3, 1, 3]),
        Column::new("Sex".into(), ["male", "female", "female", "male", "male"]),
        Column::new(
            "Age".into(),
            [Some(22.0), Some(38.0), Some(26.0), Some(35.0), None],
        ),
        Column::new("Fare".into(), [7.25, 71.28, 7.92, 53.1, 8.05]),
        Column::new("Embarked".into(), ["S", "C", "S", "S", "Q"]),
    ])
}
