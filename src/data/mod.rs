//! Data module - dataset loading, column access and cleaning

pub mod columns;
mod loader;
mod processor;

pub use loader::{load_dataset, DataSource, HttpSource, LoadedDataset, RemoteSource};
#[cfg(test)]
pub use loader::{mock_dataset, LoaderError};
pub use processor::{CleaningReport, DataProcessor};
