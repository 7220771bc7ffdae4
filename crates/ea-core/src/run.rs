//! The redaction run: collect, redact, write, report.

use crate::collect::{collect_files, CollectFilter};
use crate::error::{CoreError, Result};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::report::{write_csv_report, write_json_report, DEFAULT_REPORT_NAME};
use crate::runlog::{record_run, RunLogEntry, RunLogSink};
use ea_redact::{LabelCounts, PassOptions, RedactionOutcome, Redactor, RunAggregate};
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory used when none is given outside dry-run.
pub const DEFAULT_OUTPUT_DIR: &str = "redacted";

/// Output label recorded for dry runs without an output directory.
pub const DRY_RUN_LABEL: &str = "(dry-run)";

/// Everything a run needs besides the engine.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub filter: CollectFilter,
    pub report: Option<PathBuf>,
    pub report_csv: Option<PathBuf>,
    pub pass: PassOptions,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub aggregate: RunAggregate,
    pub report_path: PathBuf,
    pub report_csv_path: Option<PathBuf>,
    /// Whether a run log entry was appended.
    pub logged: bool,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Resolve the output root. `None` means nothing will be written.
fn resolve_output(options: &RunOptions) -> Result<Option<PathBuf>> {
    let requested = options
        .output
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty());

    match (requested, options.pass.dry_run) {
        (Some(dir), _) => Ok(Some(absolute(dir)?)),
        (None, false) => Ok(Some(absolute(Path::new(DEFAULT_OUTPUT_DIR))?)),
        (None, true) => Ok(None),
    }
}

/// Target path for `source`, relative to the input root.
fn target_for(source: &Path, input: &Path, input_is_dir: bool, output: &Path) -> PathBuf {
    let rel = if input_is_dir {
        source.strip_prefix(input).unwrap_or(source)
    } else {
        source.file_name().map(Path::new).unwrap_or(source)
    };
    output.join(rel)
}

/// Run the full pipeline and write the reports.
pub fn execute(
    options: &RunOptions,
    redactor: &Redactor,
    sink: Option<&dyn RunLogSink>,
    ctx: &LogContext,
) -> Result<RunSummary> {
    if options.input.as_os_str().is_empty() {
        return Err(CoreError::NoInput);
    }

    let input = absolute(&options.input)?;
    let metadata = fs::metadata(&input).map_err(|source| CoreError::InputMissing {
        path: input.clone(),
        source,
    })?;
    let input_is_dir = metadata.is_dir();

    let output = resolve_output(options)?;
    if let (Some(dir), false) = (&output, options.pass.dry_run) {
        fs::create_dir_all(dir)?;
    }

    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "Starting redaction run",
        input = tracing::field::display(input.display()),
        detectors = redactor.detectors().len(),
        dry_run = options.pass.dry_run
    );

    let files = collect_files(&input, &options.filter)?;
    if files.is_empty() {
        return Err(CoreError::NoFiles(input));
    }
    log_event!(
        ctx,
        DEBUG,
        event_names::FILES_COLLECTED,
        Stage::Collect,
        "Collected input files",
        files = files.len()
    );

    let output_label = match &output {
        Some(dir) => dir.display().to_string(),
        None => DRY_RUN_LABEL.to_string(),
    };
    let mut aggregate = RunAggregate::new(input.clone(), output_label);

    for source in files {
        let bytes = fs::read(&source).map_err(|e| CoreError::document(&source, e))?;
        let target = output
            .as_deref()
            .map(|dir| target_for(&source, &input, input_is_dir, dir));

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                log_event!(
                    ctx,
                    WARN,
                    event_names::FILE_SKIPPED,
                    Stage::Redact,
                    "Skipped file that is not valid UTF-8",
                    source = tracing::field::display(source.display()),
                    valid_up_to = err.utf8_error().valid_up_to()
                );
                aggregate.record(RedactionOutcome::new(source, target, LabelCounts::new(), true));
                continue;
            }
        };

        let doc = redactor.redact_document(source.clone(), target, &content, options.pass);

        if doc.write {
            if let Some(target) = &doc.outcome.target {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| CoreError::document(&source, e))?;
                }
                fs::write(target, &doc.content).map_err(|e| CoreError::document(&source, e))?;
            }
        }

        if doc.outcome.skipped {
            log_event!(
                ctx,
                DEBUG,
                event_names::FILE_SKIPPED,
                Stage::Redact,
                "Skipped clean file",
                source = tracing::field::display(source.display())
            );
        } else {
            log_event!(
                ctx,
                DEBUG,
                event_names::FILE_REDACTED,
                Stage::Redact,
                "Redacted file",
                source = tracing::field::display(source.display()),
                total = doc.outcome.total,
                written = doc.write
            );
        }

        aggregate.record(doc.outcome);
    }

    let aggregate = aggregate.finalize();

    let report_path = match &options.report {
        Some(path) => path.clone(),
        None => match (&output, options.pass.dry_run) {
            (Some(dir), false) => dir.join(DEFAULT_REPORT_NAME),
            _ => PathBuf::from(".").join(DEFAULT_REPORT_NAME),
        },
    };
    write_json_report(&report_path, &aggregate)?;
    if let Some(csv_path) = &options.report_csv {
        write_csv_report(csv_path, &aggregate)?;
    }
    log_event!(
        ctx,
        DEBUG,
        event_names::REPORT_WRITTEN,
        Stage::Report,
        "Wrote reports",
        report = tracing::field::display(report_path.display()),
        csv = options.report_csv.is_some()
    );

    let entry = RunLogEntry::from_aggregate(
        ctx.run_id.clone(),
        &aggregate,
        report_path.clone(),
        options.report_csv.clone(),
        options.pass.dry_run,
    );
    let logged = record_run(sink, &entry)?;
    if logged {
        log_event!(
            ctx,
            DEBUG,
            event_names::RUN_LOGGED,
            Stage::RunLog,
            "Appended run log entry"
        );
    }

    log_event!(
        ctx,
        INFO,
        event_names::RUN_COMPLETE,
        Stage::Report,
        "Redaction run complete",
        files = aggregate.files,
        skipped = aggregate.skipped_files,
        total_redactions = aggregate.total_redactions
    );

    Ok(RunSummary {
        aggregate,
        report_path,
        report_csv_path: options.report_csv.clone(),
        logged,
    })
}
