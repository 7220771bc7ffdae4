//! Append-only run log.
//!
//! Each completed run can be recorded as one [`RunLogEntry`]. Sinks are
//! pluggable through [`RunLogSink`]; [`JsonlRunLog`] appends one JSON line
//! per run to a file or any other writer.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use ea_redact::{LabelCounts, RunAggregate};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Summary of one run, as stored in the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub run_id: String,
    pub logged_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub input_path: PathBuf,
    pub output_path: String,
    pub dry_run: bool,
    pub file_count: usize,
    pub skipped_files: usize,
    pub total_redactions: usize,
    pub by_pattern: LabelCounts,
    pub report_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_csv_path: Option<PathBuf>,
}

impl RunLogEntry {
    /// Summarize a finalized aggregate.
    pub fn from_aggregate(
        run_id: impl Into<String>,
        aggregate: &RunAggregate,
        report_path: impl Into<PathBuf>,
        report_csv_path: Option<PathBuf>,
        dry_run: bool,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            logged_at: Utc::now(),
            generated_at: aggregate.generated_at,
            input_path: aggregate.input_path.clone(),
            output_path: aggregate.output_path.clone(),
            dry_run,
            file_count: aggregate.files,
            skipped_files: aggregate.skipped_files,
            total_redactions: aggregate.total_redactions,
            by_pattern: aggregate.by_pattern.clone(),
            report_path: report_path.into(),
            report_csv_path,
        }
    }
}

/// Destination for run summaries.
pub trait RunLogSink: Send + Sync {
    fn append(&self, entry: &RunLogEntry) -> Result<()>;
}

/// JSON-lines run log.
pub struct JsonlRunLog<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonlRunLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JsonlRunLog<File> {
    /// Open (or create) a log file for appending, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CoreError::RunLog(format!("{}: {}", parent.display(), e)))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CoreError::RunLog(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> RunLogSink for JsonlRunLog<W> {
    fn append(&self, entry: &RunLogEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| CoreError::RunLog("run log writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| CoreError::RunLog(e.to_string()))?;
        writer.flush().map_err(|e| CoreError::RunLog(e.to_string()))?;
        Ok(())
    }
}

/// Append to the sink if one is configured.
pub fn record_run(sink: Option<&dyn RunLogSink>, entry: &RunLogEntry) -> Result<bool> {
    match sink {
        Some(sink) => {
            sink.append(entry)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
