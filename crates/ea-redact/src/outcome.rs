//! Per-document outcomes and the run-level aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-label redaction counts.
pub type LabelCounts = BTreeMap<String, usize>;

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionOutcome {
    /// Input document path.
    pub source: PathBuf,

    /// Where the redacted copy goes, if an output root is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Matches redacted per detector label.
    pub redactions: LabelCounts,

    /// Sum of `redactions`.
    pub total: usize,

    /// Clean document left unwritten under skip-clean.
    #[serde(default)]
    pub skipped: bool,
}

impl RedactionOutcome {
    /// Build an outcome; `total` is derived from the counts.
    pub fn new(
        source: impl Into<PathBuf>,
        target: Option<PathBuf>,
        redactions: LabelCounts,
        skipped: bool,
    ) -> Self {
        let total = redactions.values().sum();
        Self {
            source: source.into(),
            target,
            redactions,
            total,
            skipped,
        }
    }

    /// Count for one label, zero if absent.
    pub fn count(&self, label: &str) -> usize {
        self.redactions.get(label).copied().unwrap_or(0)
    }

    /// No detector matched.
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}

/// Run-level fold of every document outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAggregate {
    pub generated_at: DateTime<Utc>,
    pub input_path: PathBuf,
    pub output_path: String,
    pub files: usize,
    #[serde(default)]
    pub skipped_files: usize,
    pub total_redactions: usize,
    pub by_pattern: LabelCounts,
    pub details: Vec<RedactionOutcome>,
}

impl RunAggregate {
    /// Start an empty aggregate stamped with the current time.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            files: 0,
            skipped_files: 0,
            total_redactions: 0,
            by_pattern: LabelCounts::new(),
            details: Vec::new(),
        }
    }

    /// Fold one document outcome into the totals.
    pub fn record(&mut self, outcome: RedactionOutcome) {
        self.files += 1;
        if outcome.skipped {
            self.skipped_files += 1;
        }
        self.total_redactions += outcome.total;
        for (label, count) in &outcome.redactions {
            *self.by_pattern.entry(label.clone()).or_insert(0) += count;
        }
        self.details.push(outcome);
    }

    /// Fold a partial aggregate built elsewhere (for example on a worker).
    pub fn merge(&mut self, other: RunAggregate) {
        for outcome in other.details {
            self.record(outcome);
        }
    }

    /// Sort details by source path. Call once all documents are recorded.
    pub fn finalize(mut self) -> Self {
        self.details.sort_by(|a, b| a.source.cmp(&b.source));
        self
    }

    /// Every label seen in the run, sorted.
    pub fn labels(&self) -> Vec<&str> {
        self.by_pattern.keys().map(String::as_str).collect()
    }

    /// Outcome for a given source path.
    pub fn outcome_for(&self, source: &Path) -> Option<&RedactionOutcome> {
        self.details.iter().find(|d| d.source == source)
    }
}
