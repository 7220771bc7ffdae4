//! Mask rendering and deterministic hash fragments.
//!
//! A mask is either a literal string or a template with `{label}`, `{n}`
//! and `{hash}` placeholders. Hash fragments are SHA-256 over
//! `salt || raw_match`, so repeated values map to the same token across
//! documents and runs.

use crate::error::{RedactError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default literal mask.
pub const DEFAULT_MASK: &str = "[REDACTED]";

/// Template used when hashing is requested without an explicit template.
pub const DEFAULT_HASH_TEMPLATE: &str = "[REDACTED:{label}:{hash}]";

/// Default number of hex characters kept from the digest.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Hex length of a SHA-256 digest.
pub const MAX_HASH_LENGTH: usize = 64;

pub const LABEL_PLACEHOLDER: &str = "{label}";
pub const INDEX_PLACEHOLDER: &str = "{n}";
pub const HASH_PLACEHOLDER: &str = "{hash}";

/// Validated mask configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskConfig {
    literal: String,
    template: Option<String>,
    hash_enabled: bool,
    salt: String,
    hash_length: usize,
}

impl MaskConfig {
    /// Build and validate a mask configuration.
    ///
    /// A blank template counts as no template. With hashing enabled and no
    /// template, [`DEFAULT_HASH_TEMPLATE`] is used; an explicit template
    /// without `{hash}` is rejected.
    pub fn new(
        literal: impl Into<String>,
        template: Option<&str>,
        hash_enabled: bool,
        salt: impl Into<String>,
        hash_length: usize,
    ) -> Result<Self> {
        let template = template
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let template = if hash_enabled {
            if hash_length == 0 || hash_length > MAX_HASH_LENGTH {
                return Err(RedactError::ConfigurationError(format!(
                    "hash length must be between 1 and {}, got {}",
                    MAX_HASH_LENGTH, hash_length
                )));
            }
            match template {
                None => Some(DEFAULT_HASH_TEMPLATE.to_string()),
                Some(t) if t.contains(HASH_PLACEHOLDER) => Some(t),
                Some(t) => {
                    return Err(RedactError::ConfigurationError(format!(
                        "hashing is enabled but mask template {:?} has no {} placeholder",
                        t, HASH_PLACEHOLDER
                    )))
                }
            }
        } else {
            template
        };

        Ok(Self {
            literal: literal.into(),
            template,
            hash_enabled,
            salt: salt.into(),
            hash_length,
        })
    }

    /// Literal mask, no template, no hashing.
    pub fn literal(mask: impl Into<String>) -> Self {
        Self {
            literal: mask.into(),
            template: None,
            hash_enabled: false,
            salt: String::new(),
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }

    /// Render the replacement token for one match.
    ///
    /// `index` is the 1-based position of the match within its detector's
    /// pass over the current document.
    pub fn render(&self, label: &str, raw_match: &str, index: usize) -> String {
        let Some(template) = &self.template else {
            return self.literal.clone();
        };

        let hash = if self.hash_enabled && template.contains(HASH_PLACEHOLDER) {
            self.hash_fragment(raw_match)
        } else {
            String::new()
        };

        apply_template(template, label, index, &hash)
    }

    /// First `hash_length` lowercase hex chars of `sha256(salt || raw)`.
    pub fn hash_fragment(&self, raw_match: &str) -> String {
        hash_fragment(&self.salt, raw_match, self.hash_length)
    }

    pub fn literal_mask(&self) -> &str {
        &self.literal
    }

    /// The effective template, after defaults were applied.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn hash_enabled(&self) -> bool {
        self.hash_enabled
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self::literal(DEFAULT_MASK)
    }
}

/// Substitute every `{label}`, `{n}` and `{hash}` in a template.
///
/// Other brace sequences are left untouched. Substitution is a single pass,
/// so placeholder-like text inside a label is never expanded again.
pub fn apply_template(template: &str, label: &str, index: usize, hash: &str) -> String {
    let index = index.to_string();
    let mut out = String::with_capacity(template.len() + label.len() + hash.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let (value, consumed) = if tail.starts_with(LABEL_PLACEHOLDER) {
            (label, LABEL_PLACEHOLDER.len())
        } else if tail.starts_with(INDEX_PLACEHOLDER) {
            (index.as_str(), INDEX_PLACEHOLDER.len())
        } else if tail.starts_with(HASH_PLACEHOLDER) {
            (hash, HASH_PLACEHOLDER.len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[consumed..];
    }
    out.push_str(rest);

    out
}

/// Salted SHA-256 fragment, truncated to `length` hex characters.
pub fn hash_fragment(salt: &str, raw: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(raw.as_bytes());
    let digest = hex::encode(hasher.finalize());

    let length = length.min(digest.len());
    digest[..length].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_template() {
        assert_eq!(
            apply_template("[REDACTED:{label}:{n}]", "email", 3, ""),
            "[REDACTED:email:3]"
        );
        assert_eq!(
            apply_template("[REDACTED:{label}:{n}:{hash}]", "email", 3, "abc123"),
            "[REDACTED:email:3:abc123]"
        );
    }

    #[test]
    fn test_apply_template_repeats_and_unknowns() {
        assert_eq!(
            apply_template("{label}/{label} {n}{n} {other} {N}", "ssn", 2, ""),
            "ssn/ssn 22 {other} {N}"
        );
    }

    #[test]
    fn test_apply_template_single_pass() {
        assert_eq!(
            apply_template("[{label}|{n}]", "custom:x{n}", 4, ""),
            "[custom:x{n}|4]"
        );
        assert_eq!(apply_template("{{n}}", "a", 9, ""), "{9}");
    }

    #[test]
    fn test_literal_mask_is_constant() {
        let mask = MaskConfig::literal("***");
        assert_eq!(mask.render("email", "a@b.co", 1), "***");
        assert_eq!(mask.render("phone", "555-123-4567", 7), "***");
    }

    #[test]
    fn test_literal_mask_does_not_expand_groups() {
        let mask = MaskConfig::literal("$0 ${1}");
        assert_eq!(mask.render("email", "a@b.co", 1), "$0 ${1}");
    }

    #[test]
    fn test_default_hash_template() {
        let mask = MaskConfig::new(DEFAULT_MASK, None, true, "salt", 8).unwrap();
        assert_eq!(mask.template(), Some(DEFAULT_HASH_TEMPLATE));

        let blank = MaskConfig::new(DEFAULT_MASK, Some("   "), true, "salt", 8).unwrap();
        assert_eq!(blank.template(), Some(DEFAULT_HASH_TEMPLATE));
    }

    #[test]
    fn test_explicit_template_without_hash_rejected() {
        let err = MaskConfig::new(DEFAULT_MASK, Some("[REDACTED:{label}:{n}]"), true, "salt", 8)
            .unwrap_err();
        assert!(matches!(err, RedactError::ConfigurationError(_)));
    }

    #[test]
    fn test_hash_length_bounds() {
        assert!(MaskConfig::new(DEFAULT_MASK, None, true, "", 0).is_err());
        assert!(MaskConfig::new(DEFAULT_MASK, None, true, "", 65).is_err());
        assert!(MaskConfig::new(DEFAULT_MASK, None, true, "", 64).is_ok());
        // Length is irrelevant while hashing is off
        assert!(MaskConfig::new(DEFAULT_MASK, None, false, "", 0).is_ok());
    }

    #[test]
    fn test_hash_fragment_known_value() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(hash_fragment("", "abc", 8), "ba7816bf");
        assert_eq!(hash_fragment("a", "bc", 8), "ba7816bf");
        assert_eq!(hash_fragment("", "abc", 64).len(), 64);
    }

    #[test]
    fn test_hash_fragment_depends_on_salt() {
        assert_ne!(
            hash_fragment("salt-a", "test@example.com", 16),
            hash_fragment("salt-b", "test@example.com", 16)
        );
    }

    #[test]
    fn test_render_with_hash_is_deterministic() {
        let mask = MaskConfig::new(DEFAULT_MASK, Some("<{label}#{n}:{hash}>"), true, "pepper", 12)
            .unwrap();
        let first = mask.render("email", "test@example.com", 1);
        let second = mask.render("email", "test@example.com", 2);
        let expected_hash = hash_fragment("pepper", "test@example.com", 12);
        assert_eq!(first, format!("<email#1:{}>", expected_hash));
        assert_eq!(second, format!("<email#2:{}>", expected_hash));
    }

    #[test]
    fn test_hash_placeholder_empty_when_hashing_disabled() {
        let mask = MaskConfig::new(DEFAULT_MASK, Some("[{label}:{hash}]"), false, "", 8).unwrap();
        assert_eq!(mask.render("dob", "1/2/2000", 1), "[dob:]");
    }
}
