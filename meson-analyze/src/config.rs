use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Knobs of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Record unknown identifiers, functions and methods as errors.
    pub report_unresolved: bool,
    /// Check calls against the catalog signatures.
    pub check_arguments: bool,
    /// Warn about assigned names that are not snake case.
    pub lint_names: bool,
    pub max_subdir_depth: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            report_unresolved: false,
            check_arguments: true,
            lint_names: true,
            max_subdir_depth: 64,
        }
    }
}

impl AnalysisOptions {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid analysis configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let text = fs::read_to_string(path)
            .with_context(|| meson_support::config_error(&shown, "unreadable"))?;
        Self::from_yaml_str(&text)
            .with_context(|| meson_support::config_error(&shown, "invalid"))
    }
}
