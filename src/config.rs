//! Analysis Configuration
//! Fixed parameters for a run. Nothing here is read from flags, files or the
//! environment; tests build their own instances.

use std::path::PathBuf;
use std::time::Duration;

/// Local cache of the dataset, relative to the working directory.
pub const LOCAL_DATASET: &str = "train.csv";

/// Remote copy of the dataset used when the local cache is missing.
pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/datasciencedojo/datasets/master/titanic.csv";

/// Directory receiving chart images and the run summary.
pub const OUTPUT_DIR: &str = "eda_output";

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub local_path: PathBuf,
    pub remote_url: String,
    pub http_timeout: Duration,
    pub output_dir: PathBuf,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from(LOCAL_DATASET),
            remote_url: DATASET_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from(OUTPUT_DIR),
            histogram_bins: 30,
            preview_rows: 5,
        }
    }
}
