//! Report writers: pretty JSON, per-file CSV and the stdout summary.

use crate::error::Result;
use ea_redact::RunAggregate;
use std::fs;
use std::io::Write;
use std::path::Path;

/// File name of the JSON report when no path is given.
pub const DEFAULT_REPORT_NAME: &str = "redaction-report.json";

/// Fixed leading CSV columns; one column per label follows.
pub const CSV_FIXED_COLUMNS: &[&str] = &["source", "target", "total_redactions", "skipped"];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the aggregate as pretty-printed JSON, creating parent directories.
pub fn write_json_report(path: &Path, aggregate: &RunAggregate) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_string_pretty(aggregate)?;
    fs::write(path, data)?;
    Ok(())
}

/// Write the per-file CSV table to any writer.
pub fn write_csv<W: Write>(writer: W, aggregate: &RunAggregate) -> Result<()> {
    let labels = aggregate.labels();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let header: Vec<&str> = CSV_FIXED_COLUMNS
        .iter()
        .copied()
        .chain(labels.iter().copied())
        .collect();
    writer.write_record(&header)?;

    for entry in &aggregate.details {
        let mut row = vec![
            entry.source.display().to_string(),
            entry
                .target
                .as_ref()
                .map(|t| t.display().to_string())
                .unwrap_or_default(),
            entry.total.to_string(),
            entry.skipped.to_string(),
        ];
        row.extend(labels.iter().map(|label| entry.count(label).to_string()));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the CSV report to a file, creating parent directories.
pub fn write_csv_report(path: &Path, aggregate: &RunAggregate) -> Result<()> {
    ensure_parent(path)?;
    let file = fs::File::create(path)?;
    write_csv(file, aggregate)
}

/// Human summary: totals, one line per label, then the report path.
pub fn write_summary<W: Write>(
    mut out: W,
    aggregate: &RunAggregate,
    report_path: &Path,
) -> Result<()> {
    writeln!(
        out,
        "Redacted {} files. Total redactions: {}",
        aggregate.files, aggregate.total_redactions
    )?;
    if aggregate.skipped_files > 0 {
        writeln!(out, "Skipped {} clean files.", aggregate.skipped_files)?;
    }
    for (label, count) in &aggregate.by_pattern {
        writeln!(out, "  {}: {}", label, count)?;
    }
    writeln!(out, "Report: {}", report_path.display())?;
    Ok(())
}

/// Print the summary to stdout.
pub fn print_summary(aggregate: &RunAggregate, report_path: &Path) -> Result<()> {
    let stdout = std::io::stdout();
    write_summary(stdout.lock(), aggregate, report_path)
}
