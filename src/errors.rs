//! Error taxonomy for the analysis and diagnosis pipeline.
//!
//! Per-file and per-function failures are isolated: callers log them and
//! continue with a partial report. Aggregation invariant violations are
//! fatal because every downstream score would be meaningless.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodediagError {
    /// A source file could not be read or parsed. Skip the file, continue.
    #[error("extraction failed for {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    /// An analyzer choked on malformed input. Skip the unit, continue
    /// with a partial report.
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// An aggregation invariant was violated. Fatal; no report is produced.
    #[error("diagnosis invariant violated: {0}")]
    Diagnosis(String),
}

impl CodediagError {
    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CodediagError::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Fatal errors abort the run; the rest are skipped and logged.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CodediagError::Diagnosis(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_diagnosis_errors_are_fatal() {
        assert!(!CodediagError::extraction("a.py", "binary file").is_fatal());
        assert!(!CodediagError::Analysis("bad function".into()).is_fatal());
        assert!(CodediagError::Diagnosis("coverage out of range".into()).is_fatal());
    }

    #[test]
    fn test_extraction_error_names_the_file() {
        let err = CodediagError::extraction("src/app.py", "unreadable");
        assert!(err.to_string().contains("src/app.py"));
    }
}
