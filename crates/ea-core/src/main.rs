//! Essay Anonymizer - PII redaction for essay collections
//!
//! The main entry point for ea-core, handling:
//! - Redaction runs over a file or directory tree
//! - Listing the active detectors for a configuration
//! - Version information

use clap::{Args, Parser, Subcommand};
use ea_core::collect::{CollectFilter, DEFAULT_EXTENSIONS};
use ea_core::config::{resolve_profile, ProfileOverrides};
use ea_core::exit_codes::ExitCode;
use ea_core::logging::{generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel};
use ea_core::report::print_summary;
use ea_core::run::{execute, RunOptions};
use ea_core::runlog::{JsonlRunLog, RunLogSink};
use ea_core::{CoreError, Result};
use ea_redact::{PassOptions, PROFILE_SCHEMA_VERSION};
use std::path::PathBuf;

/// Essay Anonymizer - redact PII from text documents
#[derive(Parser)]
#[command(name = "ea-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true, env = "EA_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact a file or directory tree and write a report
    Redact(RedactArgs),

    /// List active detector labels in application order
    Patterns(PatternsArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Detector and mask configuration shared by every command.
#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// JSON redaction profile; flags below override it
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Text to replace redactions with
    #[arg(long, env = "EA_MASK")]
    mask: Option<String>,

    /// Template using {label}, {n} and {hash} placeholders
    #[arg(long)]
    mask_template: Option<String>,

    /// Append a salted SHA-256 fragment to each mask
    #[arg(long)]
    hash: bool,

    /// Salt prepended to each match before hashing
    #[arg(long, env = "EA_HASH_SALT", hide_env_values = true)]
    hash_salt: Option<String>,

    /// Hex characters of the hash to keep (1-64)
    #[arg(long)]
    hash_length: Option<usize>,

    /// File with names to redact, one per line
    #[arg(long)]
    names_file: Option<PathBuf>,

    /// Custom regex to redact (repeatable)
    #[arg(long = "custom-regex", value_name = "REGEX")]
    custom_regex: Vec<String>,

    /// Detector label to disable; `prefix*` disables a family (repeatable)
    #[arg(long = "disable-pattern", value_name = "LABEL")]
    disable_pattern: Vec<String>,
}

impl EngineArgs {
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            mask: self.mask.clone(),
            mask_template: self.mask_template.clone(),
            hash: self.hash,
            hash_salt: self.hash_salt.clone(),
            hash_length: self.hash_length,
            names_file: self.names_file.clone(),
            custom_patterns: self.custom_regex.clone(),
            disabled_patterns: self.disable_pattern.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// File or directory to redact
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory for redacted files (default: ./redacted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Comma-separated extensions to include when input is a directory
    #[arg(long, default_value = DEFAULT_EXTENSIONS)]
    extensions: String,

    /// Directory name to skip (repeatable)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dir: Vec<String>,

    /// Path relative to the input to skip (repeatable)
    #[arg(long = "exclude-path", value_name = "PATH")]
    exclude_path: Vec<String>,

    /// JSON report path (default: <output>/redaction-report.json)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optional CSV report path
    #[arg(long)]
    report_csv: Option<PathBuf>,

    /// Append a run summary line to this JSONL file
    #[arg(long, env = "EA_RUN_LOG")]
    run_log: Option<PathBuf>,

    /// Preview redactions without writing files
    #[arg(long)]
    dry_run: bool,

    /// Do not write files with zero redactions
    #[arg(long)]
    skip_clean: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args, Debug)]
struct PatternsArgs {
    /// Print labels as a JSON array
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let result = match &cli.command {
        Commands::Redact(args) => run_redact(args),
        Commands::Patterns(args) => run_patterns(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            if code.is_internal_error() {
                tracing::error!(code = %code, error = %err, "run failed");
            } else if code.is_user_error() {
                tracing::debug!(code = %code, "rejected input or configuration");
            }
            eprintln!("ea-core: {}", err);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_redact(args: &RedactArgs) -> Result<()> {
    let input = args.input.clone().ok_or(CoreError::NoInput)?;

    let profile = resolve_profile(args.engine.profile.as_deref(), &args.engine.overrides())?;
    let redactor = profile.build_redactor()?;

    let sink = match &args.run_log {
        Some(path) => Some(JsonlRunLog::open(path)?),
        None => None,
    };

    let options = RunOptions {
        input,
        output: args.output.clone(),
        filter: CollectFilter::new(&args.extensions, &args.exclude_dir, &args.exclude_path),
        report: args.report.clone(),
        report_csv: args.report_csv.clone(),
        pass: PassOptions {
            dry_run: args.dry_run,
            skip_clean: args.skip_clean,
        },
    };

    let ctx = LogContext::new(generate_run_id());
    let summary = execute(
        &options,
        &redactor,
        sink.as_ref().map(|s| s as &dyn RunLogSink),
        &ctx,
    )?;

    print_summary(&summary.aggregate, &summary.report_path)
}

fn run_patterns(args: &PatternsArgs) -> Result<()> {
    let profile = resolve_profile(args.engine.profile.as_deref(), &args.engine.overrides())?;
    let detectors = profile.detector_set()?;
    let labels = detectors.labels();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&labels)?);
    } else {
        for label in labels {
            println!("{}", label);
        }
    }
    Ok(())
}

fn print_version() {
    println!("ea-core {}", env!("CARGO_PKG_VERSION"));
    println!("profile schema version: {}", PROFILE_SCHEMA_VERSION);
}
