//! The redaction pass.
//!
//! The [`Redactor`] applies every detector of its set, in order, to one
//! document. Each detector sees the text produced by the previous one, so a
//! span masked early is never re-matched later. Credit-card candidates are
//! redacted only when they pass the Luhn check.

use crate::detect::{Detector, DetectorSet};
use crate::luhn::luhn_valid_token;
use crate::mask::MaskConfig;
use crate::outcome::{LabelCounts, RedactionOutcome};
use regex::Captures;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Redacted text plus per-label counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedText {
    pub content: String,
    pub counts: LabelCounts,
}

impl RedactedText {
    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Write policy for a single document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOptions {
    /// Preview only; never write output.
    pub dry_run: bool,
    /// Do not write documents with zero redactions.
    pub skip_clean: bool,
}

/// Result of redacting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRedaction {
    pub outcome: RedactionOutcome,
    /// Redacted content (unchanged content for clean documents).
    pub content: String,
    /// Whether the caller should write `content` to the outcome target.
    pub write: bool,
}

/// Immutable detector set plus mask configuration.
///
/// `Redactor` holds no mutable state and is `Send + Sync`; one instance can
/// serve any number of documents concurrently.
#[derive(Debug, Clone)]
pub struct Redactor {
    detectors: DetectorSet,
    mask: MaskConfig,
}

impl Redactor {
    pub fn new(detectors: DetectorSet, mask: MaskConfig) -> Self {
        Self { detectors, mask }
    }

    /// Built-in detectors with the default literal mask.
    pub fn with_defaults() -> Self {
        Self::new(DetectorSet::builtin(), MaskConfig::default())
    }

    pub fn detectors(&self) -> &DetectorSet {
        &self.detectors
    }

    pub fn mask(&self) -> &MaskConfig {
        &self.mask
    }

    /// Run every detector over `content` and return the new text.
    pub fn redact(&self, content: &str) -> RedactedText {
        let mut counts = LabelCounts::new();
        let mut current = content.to_string();

        for detector in &self.detectors {
            let (next, hits) = self.apply_detector(detector, &current);
            if hits > 0 {
                *counts.entry(detector.label().to_string()).or_insert(0) += hits;
                current = next;
            }
        }

        RedactedText {
            content: current,
            counts,
        }
    }

    /// Redact a loaded document and decide whether it should be written.
    ///
    /// A clean document under `skip_clean` is marked skipped. Under
    /// `dry_run` nothing is written but counts and content are still
    /// computed.
    pub fn redact_document(
        &self,
        source: impl Into<PathBuf>,
        target: Option<PathBuf>,
        content: &str,
        options: PassOptions,
    ) -> DocumentRedaction {
        let redacted = self.redact(content);
        let mut outcome = RedactionOutcome::new(source, target, redacted.counts, false);
        outcome.skipped = options.skip_clean && outcome.is_clean();
        let write = !options.dry_run && !outcome.skipped && outcome.target.is_some();

        DocumentRedaction {
            outcome,
            content: redacted.content,
            write,
        }
    }

    /// One detector pass. Returns the rewritten text and the number of
    /// redacted matches.
    fn apply_detector(&self, detector: &Detector, content: &str) -> (String, usize) {
        let label = detector.label();
        let gate_cards = detector.is_credit_card();
        let mut index = 0usize;

        let rewritten = detector.regex().replace_all(content, |caps: &Captures<'_>| {
            let raw = &caps[0];
            if gate_cards && !luhn_valid_token(raw) {
                return raw.to_string();
            }
            index += 1;
            self.mask.render(label, raw, index)
        });

        (rewritten.into_owned(), index)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
