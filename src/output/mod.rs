//! Output module for exporting harvested datasets
//!
//! This module handles:
//! - Writing the dataset as JSON keyed by product id
//! - Upserting the dataset into a SQLite database
//! - Formatting the end-of-run report

mod json;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::JsonExporter;
pub use sqlite_output::SqliteExporter;
pub use stats::{format_report, print_report};
pub use traits::{DatasetExporter, OutputError, OutputResult};

use crate::config::OutputConfig;
use crate::dataset::Dataset;
use std::path::Path;

/// Builds the exporters selected by the output configuration
///
/// File names are resolved relative to `config.directory`; the directory
/// itself must already exist.
pub fn exporters_for(config: &OutputConfig) -> Vec<Box<dyn DatasetExporter>> {
    let directory = Path::new(&config.directory);
    let mut exporters: Vec<Box<dyn DatasetExporter>> =
        vec![Box::new(JsonExporter::new(directory.join(&config.json_file)))];

    if let Some(database_file) = &config.database_file {
        exporters.push(Box::new(SqliteExporter::new(directory.join(database_file))));
    }

    exporters
}

/// Writes the dataset with every configured exporter
///
/// Creates the output directory first if it is missing.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The destinations written, in exporter order
/// * `Err(HarvestError::Io)` - The output directory could not be created
/// * `Err(HarvestError::Output)` - An exporter failed; later exporters are not run
pub fn export_dataset(config: &OutputConfig, dataset: &Dataset) -> crate::Result<Vec<String>> {
    std::fs::create_dir_all(&config.directory)?;

    let mut written = Vec::new();
    for exporter in exporters_for(config) {
        exporter.export(dataset)?;
        written.push(exporter.destination());
    }

    Ok(written)
}
