//! Error types for propbridge-engine.

use std::path::PathBuf;

use thiserror::Error;

use propbridge_artifact::ArtifactError;
use propbridge_core::{SettingsError, ValidationError};

/// The external engine could not be run, or ran and did not succeed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch engine {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// Killed by a signal; there is no exit code.
    #[error("engine terminated abnormally ({status})")]
    Terminated { status: String },

    #[error("engine exited successfully but wrote no output at {path}")]
    MissingOutput { path: PathBuf },
}

/// Error surface of [`Orchestrator::propagate`](crate::Orchestrator::propagate).
#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("invalid propagation input: {0}")]
    Validation(#[from] ValidationError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("run record I/O error at {path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run record JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

pub(crate) fn record_err(path: impl Into<PathBuf>, source: std::io::Error) -> PropagateError {
    PropagateError::Record {
        path: path.into(),
        source,
    }
}
