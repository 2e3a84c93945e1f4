//! Error types for the analysis pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Failures the pipeline distinguishes.
///
/// `FileRead` and `PackageMetadataUnavailable` are absorbed where they occur and
/// surface only as warnings. `DirectoryList` and `ReportWrite` abort the stage
/// that raised them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A single file could not be read or stat'd
    #[error("could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk itself failed
    #[error("could not list directory {}: {message}", path.display())]
    DirectoryList { path: PathBuf, message: String },

    /// `package.json` data was missing or malformed
    #[error("package metadata unavailable: {0}")]
    PackageMetadataUnavailable(String),

    /// The output directory or a report file could not be written
    #[error("could not write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_write_message_names_the_path() {
        let err = AnalysisError::ReportWrite {
            path: PathBuf::from("/nope/report.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/report.md"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn converts_into_anyhow_and_back() {
        let err: anyhow::Error = AnalysisError::DirectoryList {
            path: PathBuf::from("src"),
            message: "gone".into(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::DirectoryList { .. })
        ));
    }
}
