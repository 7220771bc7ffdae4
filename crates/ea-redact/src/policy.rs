//! Redaction profile configuration.
//!
//! A profile bundles everything needed to build a [`Redactor`]: mask
//! settings, hashing, custom patterns, names, and disabled detectors. It is
//! stored as JSON; every field is optional on disk.

use crate::detect::{load_names, DetectorSet};
use crate::engine::Redactor;
use crate::filter::PatternFilter;
use crate::mask::{MaskConfig, DEFAULT_HASH_LENGTH, DEFAULT_MASK};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Schema version for the profile file.
pub const PROFILE_SCHEMA_VERSION: &str = "1.0.0";

/// Redaction profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionProfile {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Literal mask used when no template is set.
    #[serde(default = "default_mask")]
    pub mask: String,

    /// Mask template with `{label}`, `{n}` and `{hash}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_template: Option<String>,

    /// Append a salted hash fragment to each mask.
    #[serde(default)]
    pub hash: bool,

    /// Salt prepended to each match before hashing.
    #[serde(default)]
    pub hash_salt: String,

    /// Hex characters kept from the digest.
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Extra regexes, applied after the built-ins in this order.
    #[serde(default)]
    pub custom_patterns: Vec<String>,

    /// Names to redact as whole words, case-insensitively.
    #[serde(default)]
    pub names: Vec<String>,

    /// Optional file with one name per line, read at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names_file: Option<PathBuf>,

    /// Disable requests: exact labels or `prefix*` wildcards.
    #[serde(default)]
    pub disabled_patterns: Vec<String>,
}

fn default_schema_version() -> String {
    PROFILE_SCHEMA_VERSION.to_string()
}

fn default_mask() -> String {
    DEFAULT_MASK.to_string()
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

impl RedactionProfile {
    /// Create a profile with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a profile from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile: RedactionProfile = serde_json::from_str(&content)?;
        Ok(profile)
    }

    /// Save the profile as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the mask settings.
    pub fn mask_config(&self) -> Result<MaskConfig> {
        MaskConfig::new(
            self.mask.clone(),
            self.mask_template.as_deref(),
            self.hash,
            self.hash_salt.clone(),
            self.hash_length,
        )
    }

    /// Every name: inline names first, then the names file.
    pub fn resolved_names(&self) -> Result<Vec<String>> {
        let mut names = self.names.clone();
        if let Some(path) = &self.names_file {
            names.extend(load_names(path)?);
        }
        Ok(names)
    }

    /// Build the filtered detector set.
    pub fn detector_set(&self) -> Result<DetectorSet> {
        let names = self.resolved_names()?;
        let detectors = DetectorSet::build(&self.custom_patterns, &names)?;
        Ok(PatternFilter::new(&self.disabled_patterns).apply(detectors))
    }

    /// Build a ready-to-use redactor.
    ///
    /// Fails before any document is touched if a pattern or the mask
    /// configuration is invalid.
    pub fn build_redactor(&self) -> Result<Redactor> {
        let mask = self.mask_config()?;
        let detectors = self.detector_set()?;
        Ok(Redactor::new(detectors, mask))
    }
}

impl Default for RedactionProfile {
    fn default() -> Self {
        Self {
            schema_version: PROFILE_SCHEMA_VERSION.to_string(),
            mask: DEFAULT_MASK.to_string(),
            mask_template: None,
            hash: false,
            hash_salt: String::new(),
            hash_length: DEFAULT_HASH_LENGTH,
            custom_patterns: Vec::new(),
            names: Vec::new(),
            names_file: None,
            disabled_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RedactError;

    #[test]
    fn test_default_profile() {
        let profile = RedactionProfile::default();
        assert_eq!(profile.schema_version, PROFILE_SCHEMA_VERSION);
        assert_eq!(profile.mask, "[REDACTED]");
        assert_eq!(profile.hash_length, 8);
        assert!(!profile.hash);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let profile: RedactionProfile =
            serde_json::from_str(r#"{"hash": true, "names": ["Jordan"]}"#).unwrap();
        assert!(profile.hash);
        assert_eq!(profile.mask, "[REDACTED]");
        assert_eq!(profile.hash_length, 8);
        assert_eq!(profile.names, vec!["Jordan"]);

        let mask = profile.mask_config().unwrap();
        assert_eq!(mask.template(), Some("[REDACTED:{label}:{hash}]"));
    }

    #[test]
    fn test_build_redactor_applies_filter() {
        let profile = RedactionProfile {
            names: vec!["Jordan".to_string()],
            custom_patterns: vec![r"\bSTU-\d{4}\b".to_string()],
            disabled_patterns: vec!["name:*".to_string(), "url".to_string()],
            ..Default::default()
        };
        let redactor = profile.build_redactor().unwrap();
        let labels = redactor.detectors().labels();
        assert!(!labels.contains(&"url"));
        assert!(!labels.contains(&"name:Jordan"));
        assert_eq!(labels.last(), Some(&r"custom:\bSTU-\d{4}\b"));
    }

    #[test]
    fn test_invalid_profile_fails_fast() {
        let profile = RedactionProfile {
            hash: true,
            mask_template: Some("[{label}]".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            profile.build_redactor(),
            Err(RedactError::ConfigurationError(_))
        ));

        let profile = RedactionProfile {
            custom_patterns: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            profile.build_redactor(),
            Err(RedactError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_names_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let names_path = dir.path().join("names.txt");
        std::fs::write(&names_path, "Lee\n\nAna Ruiz\n").unwrap();

        let profile = RedactionProfile {
            names: vec!["Jordan".to_string()],
            names_file: Some(names_path),
            ..Default::default()
        };
        assert_eq!(
            profile.resolved_names().unwrap(),
            vec!["Jordan", "Lee", "Ana Ruiz"]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let profile = RedactionProfile {
            mask: "***".to_string(),
            hash: true,
            hash_salt: "s".to_string(),
            hash_length: 12,
            ..Default::default()
        };
        profile.save(&path).unwrap();
        assert_eq!(RedactionProfile::load(&path).unwrap(), profile);
    }
}
