//! PII redaction engine for the essay anonymizer.
//!
//! This crate holds everything with exact-answer semantics: the ordered
//! detector set, the disable filter, the Luhn gate for card numbers, mask
//! rendering with deterministic hash fragments, and the per-document and
//! per-run counting model. It performs no I/O on documents; callers hand it
//! loaded text and receive redacted text plus counts.
//!
//! # Key Features
//!
//! - **Ordered detectors**: built-ins run in a fixed order, followed by
//!   custom regexes and names. Each detector sees the output of the previous
//!   one, so masked spans are never re-matched.
//! - **Deterministic tokens**: `{hash}` fragments are SHA-256 over
//!   `salt || match`, stable across documents and runs.
//! - **Luhn gating**: card-shaped digit runs are redacted only when they
//!   pass the checksum.
//! - **Fail-fast configuration**: bad patterns and inconsistent masks are
//!   rejected before any document is processed.
//!
//! # Example
//!
//! ```
//! use ea_redact::{DetectorSet, MaskConfig, PatternFilter, Redactor};
//!
//! let detectors = DetectorSet::build(Vec::<String>::new(), ["Jordan"]).unwrap();
//! let detectors = PatternFilter::new(["url"]).apply(detectors);
//! let mask = MaskConfig::new("[REDACTED]", Some("[{label}:{n}]"), false, "", 8).unwrap();
//! let redactor = Redactor::new(detectors, mask);
//!
//! let result = redactor.redact("Jordan wrote from jordan@example.com");
//! assert_eq!(result.content, "[name:Jordan:1] wrote from [email:1]");
//! ```

pub mod detect;
pub mod engine;
pub mod error;
pub mod filter;
pub mod luhn;
pub mod mask;
pub mod outcome;
pub mod policy;

pub use detect::{labels, load_names, parse_names, Detector, DetectorSet};
pub use engine::{DocumentRedaction, PassOptions, RedactedText, Redactor};
pub use error::{RedactError, Result};
pub use filter::{LabelMatcher, PatternFilter};
pub use luhn::{luhn_valid, luhn_valid_token};
pub use mask::{apply_template, hash_fragment, MaskConfig};
pub use outcome::{LabelCounts, RedactionOutcome, RunAggregate};
pub use policy::{RedactionProfile, PROFILE_SCHEMA_VERSION};
