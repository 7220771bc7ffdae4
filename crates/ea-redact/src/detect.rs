//! PII detectors and detector-set construction.
//!
//! A detector is a labeled regex. The set is ordered: built-ins first in a
//! fixed order, then custom patterns, then names. The order matters because
//! each detector runs over text already rewritten by the ones before it.

use crate::error::{RedactError, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Labels of the built-in detectors.
pub mod labels {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const SSN: &str = "ssn";
    pub const DOB: &str = "dob";
    pub const STREET_ADDRESS: &str = "street_address";
    pub const URL: &str = "url";
    pub const IP_ADDRESS: &str = "ip_address";
    pub const CREDIT_CARD: &str = "credit_card";

    /// Prefix for detectors built from a names list.
    pub const NAME_PREFIX: &str = "name:";
    /// Prefix for detectors built from custom regexes.
    pub const CUSTOM_PREFIX: &str = "custom:";
}

/// Built-in detector definitions, in application order.
///
/// Digit and whitespace classes are ASCII-only; digits from other scripts
/// never match.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    (labels::EMAIL, r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
    (
        labels::PHONE,
        r"(?i)(?:\+?1[\t\n\f\r .-]?)?(?:\([\t\n\f\r ]*[0-9]{3}[\t\n\f\r ]*\)|[0-9]{3})[\t\n\f\r .-]?[0-9]{3}[\t\n\f\r .-]?[0-9]{4}",
    ),
    (labels::SSN, r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b"),
    (
        labels::DOB,
        r"\b(?:0?[1-9]|1[0-2])[/-](?:0?[1-9]|[12][0-9]|3[01])[/-](?:19|20)[0-9]{2}\b",
    ),
    (
        labels::STREET_ADDRESS,
        r"\b[0-9]+[\t\n\f\r ]+[A-Za-z0-9.\-\t\n\f\r ]+[\t\n\f\r ]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Court|Ct)\b",
    ),
    (labels::URL, r"\bhttps?://[^\t\n\f\r ]+"),
    (labels::IP_ADDRESS, r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b"),
    (labels::CREDIT_CARD, r"\b(?:[0-9][ -]*?){13,19}\b"),
];

// Pre-compiled built-in detectors
static BUILTIN_DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    BUILTIN_PATTERNS
        .iter()
        .map(|(label, pattern)| Detector {
            label: (*label).to_string(),
            regex: Regex::new(pattern).expect("built-in pattern must compile"),
        })
        .collect()
});

/// A labeled pattern used to find PII-shaped spans.
#[derive(Debug, Clone)]
pub struct Detector {
    label: String,
    regex: Regex,
}

impl Detector {
    /// Compile a detector from a raw pattern.
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| RedactError::invalid_pattern(pattern, e))?;
        Ok(Self {
            label: label.into(),
            regex,
        })
    }

    /// Detector for a user-supplied regex, labeled `custom:<raw>`.
    pub fn custom(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(RedactError::invalid_pattern(
                raw,
                "custom regex cannot be empty",
            ));
        }
        Self::new(format!("{}{}", labels::CUSTOM_PREFIX, raw), raw)
    }

    /// Case-insensitive whole-word detector for a literal name.
    pub fn name(name: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\b", regex::escape(name));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RedactError::invalid_pattern(name, e))?;
        Ok(Self {
            label: format!("{}{}", labels::NAME_PREFIX, name),
            regex,
        })
    }

    /// The detector label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether matches need the Luhn gate before redaction.
    pub fn is_credit_card(&self) -> bool {
        self.label == labels::CREDIT_CARD
    }
}

/// Ordered, immutable collection of detectors.
#[derive(Debug, Clone, Default)]
pub struct DetectorSet {
    detectors: Vec<Detector>,
}

impl DetectorSet {
    /// The built-in detectors only.
    pub fn builtin() -> Self {
        Self {
            detectors: BUILTIN_DETECTORS.clone(),
        }
    }

    /// Built-ins followed by custom regexes, then names.
    ///
    /// Fails on the first custom pattern or name that does not compile.
    /// Blank names are skipped; names are trimmed.
    pub fn build<C, N>(custom_patterns: C, names: N) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let mut set = Self::builtin();

        for raw in custom_patterns {
            set.detectors.push(Detector::custom(raw.as_ref())?);
        }

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            set.detectors.push(Detector::name(name)?);
        }

        Ok(set)
    }

    /// Build a set from explicit detectors, keeping their order.
    pub fn from_detectors(detectors: Vec<Detector>) -> Self {
        Self { detectors }
    }

    /// Keep only detectors for which the predicate holds, preserving order.
    pub fn retain<F>(mut self, keep: F) -> Self
    where
        F: FnMut(&Detector) -> bool,
    {
        self.detectors.retain(keep);
        self
    }

    /// Iterate detectors in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Detector> {
        self.detectors.iter()
    }

    /// Labels in application order.
    pub fn labels(&self) -> Vec<&str> {
        self.detectors.iter().map(Detector::label).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl<'a> IntoIterator for &'a DetectorSet {
    type Item = &'a Detector;
    type IntoIter = std::slice::Iter<'a, Detector>;

    fn into_iter(self) -> Self::IntoIter {
        self.detectors.iter()
    }
}

impl fmt::Display for DetectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(","))
    }
}

/// Read a names list: one name per line, blank lines skipped.
pub fn parse_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load a names file from disk.
pub fn load_names<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_names(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match<'a>(set: &DetectorSet, label: &str, text: &'a str) -> Option<&'a str> {
        set.iter()
            .find(|d| d.label() == label)
            .and_then(|d| d.regex().find(text))
            .map(|m| m.as_str())
    }

    #[test]
    fn test_builtin_order() {
        let set = DetectorSet::builtin();
        assert_eq!(
            set.labels(),
            vec![
                "email",
                "phone",
                "ssn",
                "dob",
                "street_address",
                "url",
                "ip_address",
                "credit_card"
            ]
        );
    }

    #[test]
    fn test_custom_and_names_appended_in_order() {
        let set = DetectorSet::build(["\\bZ\\d+\\b", "case-\\d+"], ["Jordan", "  ", "Ana Ruiz"])
            .unwrap();
        let labels = set.labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[8], "custom:\\bZ\\d+\\b");
        assert_eq!(labels[9], "custom:case-\\d+");
        assert_eq!(labels[10], "name:Jordan");
        assert_eq!(labels[11], "name:Ana Ruiz");
    }

    #[test]
    fn test_invalid_custom_pattern_names_offender() {
        let err = DetectorSet::build(["ok\\d", "(unclosed"], Vec::<String>::new()).unwrap_err();
        match err {
            RedactError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_custom_pattern_rejected() {
        let err = DetectorSet::build(["  "], Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RedactError::InvalidPattern { .. }));
    }

    #[test]
    fn test_name_is_literal_and_case_insensitive() {
        let detector = Detector::name("Mary-Jo O'Neil.Jr").unwrap();
        assert!(detector.regex().is_match("signed mary-jo o'neil.jr today"));
        assert!(!detector.regex().is_match("signed Mary-Jo O'NeilxJr today"));

        let jordan = Detector::name("Jordan").unwrap();
        assert!(jordan.regex().is_match("JORDAN wrote this"));
        assert!(!jordan.regex().is_match("Jordans wrote this"));
        assert_eq!(jordan.label(), "name:Jordan");
    }

    #[test]
    fn test_builtin_shapes() {
        let set = DetectorSet::builtin();
        assert_eq!(
            first_match(&set, "email", "mail test@example.com now"),
            Some("test@example.com")
        );
        assert_eq!(
            first_match(&set, "phone", "call (555) 123-4567"),
            Some("(555) 123-4567")
        );
        assert_eq!(
            first_match(&set, "phone", "call +1 555.123.4567"),
            Some("+1 555.123.4567")
        );
        assert_eq!(first_match(&set, "ssn", "ssn 123-45-6789."), Some("123-45-6789"));
        assert_eq!(first_match(&set, "dob", "born 4/12/1999"), Some("4/12/1999"));
        assert_eq!(first_match(&set, "dob", "born 4/12/1899"), None);
        assert_eq!(
            first_match(&set, "street_address", "at 742 Evergreen Terrace Way today"),
            Some("742 Evergreen Terrace Way")
        );
        assert_eq!(
            first_match(&set, "url", "see https://example.com/a?b=1 now"),
            Some("https://example.com/a?b=1")
        );
        assert_eq!(
            first_match(&set, "ip_address", "host 999.1.1.1 up"),
            Some("999.1.1.1")
        );
        assert_eq!(
            first_match(&set, "credit_card", "card 4111-1111-1111-1111 end"),
            Some("4111-1111-1111-1111")
        );
    }

    #[test]
    fn test_builtins_ignore_non_ascii_digits() {
        let set = DetectorSet::builtin();
        assert_eq!(first_match(&set, "ssn", "ssn १२३-४५-६७८९ end"), None);
        assert_eq!(first_match(&set, "phone", "call ٥٥٥-١٢٣-٤٥٦٧"), None);
        assert_eq!(first_match(&set, "ip_address", "ip ١٩٢.١٦٨.١.١"), None);
        assert_eq!(first_match(&set, "dob", "born ٤/١٢/١٩٩٩"), None);
        assert_eq!(
            first_match(&set, "credit_card", "card ４１１１ １１１１ １１１１ １１１１"),
            None
        );
        // Mixed scripts only match on the ASCII run.
        assert_eq!(
            first_match(&set, "phone", "tel ٥ 555-123-4567"),
            Some("555-123-4567")
        );
    }

    #[test]
    fn test_parse_names() {
        let names = parse_names("Jordan\n\n  Ana Ruiz  \r\n\t\nLee\n");
        assert_eq!(names, vec!["Jordan", "Ana Ruiz", "Lee"]);
    }

    #[test]
    fn test_load_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        std::fs::write(&path, "Jordan\nLee\n").unwrap();
        assert_eq!(load_names(&path).unwrap(), vec!["Jordan", "Lee"]);
    }
}
