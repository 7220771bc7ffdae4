//! Essay Anonymizer Core Library
//!
//! The tool around the `ea-redact` engine:
//! - Exit codes for CLI operations
//! - Redaction profile resolution (JSON profile plus CLI overrides)
//! - Input file collection with extension and exclude filters
//! - The redaction run and its JSON/CSV reports
//! - Append-only run log
//! - Structured logging
//!
//! The binary entry point is in `main.rs`.

pub mod collect;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod report;
pub mod run;
pub mod runlog;

pub use error::{CoreError, Result};
pub use exit_codes::ExitCode;
