//! Comparison settings
//!
//! Provides [`Settings`], the named toggles consumed by the archive differs.

use crate::error::ArchiveError;
use serde::{Deserialize, Serialize};

/// Toggles for an archive comparison
///
/// Every field has a default, so a settings document only names what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report differing last-modified timestamps (`entry.time`)
    pub compare_timestamps: bool,

    /// Report differing extra-field bytes (`entry.extra`)
    pub compare_extra: bool,

    /// Refine a changed manifest into attribute-level diffs
    pub refine_manifest: bool,

    /// Compare shared entries on the rayon pool
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compare_timestamps: false,
            compare_extra: true,
            refine_manifest: true,
            parallel: true,
        }
    }
}

impl Settings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode settings from a TOML document
    ///
    /// # Errors
    /// Returns [`ArchiveError::Settings`] if the document is not valid TOML or
    /// a field has the wrong type
    pub fn from_toml_str(document: &str) -> Result<Self, ArchiveError> {
        Ok(toml::from_str(document)?)
    }

    /// With timestamp comparison
    #[inline]
    #[must_use]
    pub fn with_compare_timestamps(mut self, enabled: bool) -> Self {
        self.compare_timestamps = enabled;
        self
    }

    /// With extra-field comparison
    #[inline]
    #[must_use]
    pub fn with_compare_extra(mut self, enabled: bool) -> Self {
        self.compare_extra = enabled;
        self
    }

    /// With manifest refinement
    #[inline]
    #[must_use]
    pub fn with_refine_manifest(mut self, enabled: bool) -> Self {
        self.refine_manifest = enabled;
        self
    }

    /// With parallel entry comparison
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert!(!settings.compare_timestamps);
        assert!(settings.compare_extra);
        assert!(settings.refine_manifest);
        assert!(settings.parallel);
    }

    #[test]
    fn settings_from_partial_toml() {
        let settings = Settings::from_toml_str("compare_timestamps = true\nparallel = false\n").unwrap();
        assert_eq!(
            settings,
            Settings::new()
                .with_compare_timestamps(true)
                .with_parallel(false)
        );
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn settings_rejects_wrong_type() {
        let err = Settings::from_toml_str("compare_extra = \"yes\"").unwrap_err();
        assert!(matches!(err, ArchiveError::Settings(_)));
        assert!(err.to_string().starts_with("invalid settings"));
    }
}
