//! Configuration for the analysis pipeline.
//!
//! Loaded from an optional `codediag.toml` at the project root; every field
//! has a default so a missing or partial file is fine. CLI flags are applied
//! on top by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_complexity_threshold() -> u32 {
    10
}

fn default_coupling_threshold() -> u32 {
    8
}

fn default_min_finding_confidence() -> f64 {
    0.6
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Functions with CC above this are flagged.
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: u32,

    /// Modules whose combined import degree exceeds this are flagged.
    #[serde(default = "default_coupling_threshold")]
    pub coupling_threshold: u32,

    /// Externally supplied (AI) findings below this confidence are dropped
    /// before the merge. Static and security findings are not filtered.
    #[serde(default = "default_min_finding_confidence")]
    pub min_finding_confidence: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: default_complexity_threshold(),
            coupling_threshold: default_coupling_threshold(),
            min_finding_confidence: default_min_finding_confidence(),
        }
    }
}

impl AnalysisConfig {
    /// Load from `<root>/codediag.toml`, falling back to defaults when the
    /// file is absent.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join("codediag.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.complexity_threshold, 10);
        assert_eq!(config.coupling_threshold, 8);
        assert!((config.min_finding_confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AnalysisConfig = toml::from_str("complexity_threshold = 15").unwrap();
        assert_eq!(config.complexity_threshold, 15);
        assert_eq!(config.coupling_threshold, 8);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = std::env::temp_dir();
        let config = AnalysisConfig::load(&dir.join("codediag-no-such-dir")).unwrap();
        assert_eq!(config.complexity_threshold, 10);
    }
}
