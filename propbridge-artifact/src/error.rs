//! Error types for propbridge-artifact.

use std::path::PathBuf;

use thiserror::Error;

use propbridge_core::ValidationError;

/// All errors that can arise from artifact encoding and file lifecycle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Deleting, creating or writing the artifact (or its run directory) failed.
    #[error("artifact write failed at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cleanup was requested but nothing is there.
    #[error("no artifact at {path}")]
    NotFound { path: PathBuf },

    /// Artifact text could not be read back into a config and request.
    #[error("malformed artifact at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A required key never appeared in the artifact text.
    #[error("artifact is missing key `{key}`")]
    MissingKey { key: String },

    /// Artifact text parsed, but the values break a config invariant.
    #[error("artifact values are invalid: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience constructor for [`ArtifactError::Write`].
pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> ArtifactError {
    ArtifactError::Write {
        path: path.into(),
        source,
    }
}

pub(crate) fn parse_err(line: usize, reason: impl Into<String>) -> ArtifactError {
    ArtifactError::Parse {
        line,
        reason: reason.into(),
    }
}
