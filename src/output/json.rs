//! JSON export
//!
//! Writes the dataset as one pretty-printed object keyed by product id.

use crate::dataset::Dataset;
use crate::output::traits::{DatasetExporter, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Exports the dataset to a JSON file, replacing any previous content
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetExporter for JsonExporter {
    fn export(&self, dataset: &Dataset) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, dataset)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} products to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
