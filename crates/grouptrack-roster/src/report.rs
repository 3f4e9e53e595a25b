//! Report artifact

use grouptrack_core::{Result, UserReport};
use std::fs;
use std::path::PathBuf;

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "data.json";

/// Writes the permission report to disk.
#[derive(Debug, Clone)]
pub struct ReportEmitter {
    output_dir: PathBuf,
}

impl ReportEmitter {
    /// Create an emitter writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Full path of the report file
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    /// Render the report as compact JSON
    pub fn to_json(report: &UserReport) -> Result<String> {
        Ok(serde_json::to_string(report)?)
    }

    /// Write the report, creating the output directory if needed.
    ///
    /// An existing report is overwritten. Returns the written path.
    pub fn emit(&self, report: &UserReport) -> Result<PathBuf> {
        let json = Self::to_json(report)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.report_path();
        fs::write(&path, json)?;
        tracing::info!("Wrote report for {} users to {}", report.len(), path.display());
        Ok(path)
    }
}
