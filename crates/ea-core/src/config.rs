//! Redaction profile resolution.
//!
//! The effective profile is the JSON profile file (or defaults) with CLI
//! flags layered on top: scalar flags replace profile values, list flags
//! extend them.

use crate::error::Result;
use ea_redact::RedactionProfile;
use std::path::{Path, PathBuf};

/// Command-line values that override a loaded profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub mask: Option<String>,
    pub mask_template: Option<String>,
    /// `true` turns hashing on; `false` keeps the profile's setting.
    pub hash: bool,
    pub hash_salt: Option<String>,
    pub hash_length: Option<usize>,
    pub names_file: Option<PathBuf>,
    pub custom_patterns: Vec<String>,
    pub disabled_patterns: Vec<String>,
}

impl ProfileOverrides {
    /// Layer these overrides onto `profile`.
    pub fn apply(&self, mut profile: RedactionProfile) -> RedactionProfile {
        if let Some(mask) = &self.mask {
            profile.mask = mask.clone();
        }
        if let Some(template) = &self.mask_template {
            profile.mask_template = Some(template.clone());
        }
        if self.hash {
            profile.hash = true;
        }
        if let Some(salt) = &self.hash_salt {
            profile.hash_salt = salt.clone();
        }
        if let Some(length) = self.hash_length {
            profile.hash_length = length;
        }
        if let Some(path) = &self.names_file {
            profile.names_file = Some(path.clone());
        }
        profile
            .custom_patterns
            .extend(self.custom_patterns.iter().cloned());
        profile
            .disabled_patterns
            .extend(self.disabled_patterns.iter().cloned());
        profile
    }
}

/// Load the profile at `path` (or defaults) and apply `overrides`.
pub fn resolve_profile(
    path: Option<&Path>,
    overrides: &ProfileOverrides,
) -> Result<RedactionProfile> {
    let base = match path {
        Some(path) => RedactionProfile::load(path)?,
        None => RedactionProfile::default(),
    };
    Ok(overrides.apply(base))
}
