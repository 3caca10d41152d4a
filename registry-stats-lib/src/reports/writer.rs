use super::common::report_file_name;
use crate::Result;
use crate::registry::ProviderRecord;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use ohno::IntoAppError;
use serde::Serialize;
use std::fs;
use std::io::BufWriter;

const LOG_TARGET: &str = "   reports";

/// Saves reports into a directory under timestamped file names.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: Utf8PathBuf,
    prefix: String,
}

impl ReportWriter {
    /// Create a writer for `output_dir`, creating the directory if needed.
    pub fn new(output_dir: impl Into<Utf8PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).into_app_err_with(|| format!("creating output directory '{output_dir}'"))?;

        Ok(Self {
            output_dir,
            prefix: prefix.into(),
        })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Full path of the report with the given timestamp and extension.
    #[must_use]
    pub fn path_for(&self, timestamp: &DateTime<Local>, extension: &str) -> Utf8PathBuf {
        self.output_dir.join(report_file_name(&self.prefix, timestamp, extension))
    }

    /// Save `value` as pretty-printed JSON.
    ///
    /// Returns the path written, or `None` after logging the failure.
    pub fn save_json<T: Serialize + ?Sized>(&self, value: &T, timestamp: &DateTime<Local>) -> Option<Utf8PathBuf> {
        let path = self.path_for(timestamp, "json");

        let result = write_json(value, &path);
        Self::finish(result, path, "JSON")
    }

    /// Save `records` as CSV, highest downloads first.
    ///
    /// Returns the path written, or `None` after logging the failure.
    pub fn save_csv(&self, records: &[ProviderRecord], timestamp: &DateTime<Local>) -> Option<Utf8PathBuf> {
        let path = self.path_for(timestamp, "csv");

        let result = fs::File::create(&path)
            .into_app_err_with(|| format!("creating '{path}'"))
            .and_then(|file| super::csv::generate(records, BufWriter::new(file)));

        Self::finish(result, path, "CSV")
    }

    fn finish(result: Result<()>, path: Utf8PathBuf, kind: &str) -> Option<Utf8PathBuf> {
        match result {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "Report saved to {path}");
                Some(path)
            }
            Err(e) => {
                log::error!(target: LOG_TARGET, "Error saving {kind} report: {e:#}");
                None
            }
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Utf8Path) -> Result<()> {
    let mut json_output = String::new();
    super::json::generate(value, &mut json_output)?;
    fs::write(path, json_output).into_app_err_with(|| format!("writing '{path}'"))
}
