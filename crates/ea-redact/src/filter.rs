//! Disabling detectors by label.
//!
//! A disable request is either an exact label (`phone`) or a prefix
//! wildcard (`name:*`). Requests are parsed once into [`LabelMatcher`]s.

use crate::detect::DetectorSet;
use serde::{Deserialize, Serialize};

/// A single parsed disable request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LabelMatcher {
    /// Matches one label exactly.
    Exact(String),
    /// Matches every label starting with the prefix.
    Prefix(String),
}

impl LabelMatcher {
    /// Parse a raw request. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_suffix('*') {
            Some(prefix) => Some(LabelMatcher::Prefix(prefix.to_string())),
            None => Some(LabelMatcher::Exact(raw.to_string())),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatcher::Exact(exact) => label == exact,
            LabelMatcher::Prefix(prefix) => label.starts_with(prefix.as_str()),
        }
    }
}

impl std::fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelMatcher::Exact(exact) => write!(f, "{}", exact),
            LabelMatcher::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

/// A set of disable requests applied to a [`DetectorSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternFilter {
    matchers: Vec<LabelMatcher>,
}

impl PatternFilter {
    /// Parse raw requests, skipping blank entries.
    pub fn new<I>(requests: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            matchers: requests
                .into_iter()
                .filter_map(|raw| LabelMatcher::parse(raw.as_ref()))
                .collect(),
        }
    }

    /// Whether any request disables this label.
    pub fn disables(&self, label: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(label))
    }

    /// Drop disabled detectors, keeping the order of the rest.
    ///
    /// Requests that match nothing are ignored.
    pub fn apply(&self, detectors: DetectorSet) -> DetectorSet {
        if self.matchers.is_empty() {
            return detectors;
        }
        detectors.retain(|d| !self.disables(d.label()))
    }

    pub fn matchers(&self) -> &[LabelMatcher] {
        &self.matchers
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
