//! Error types for propbridge-core.

use std::path::PathBuf;

use thiserror::Error;

/// A propagation config or request broke one of its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A vector field did not have exactly three components.
    #[error("{field} must have exactly 3 components, got {len}")]
    VectorArity { field: &'static str, len: usize },

    /// A physical quantity that must be strictly positive was zero or negative.
    #[error("{field} must be strictly positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A dimensionless coefficient was negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// NaN or infinity in a numeric field.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// `step_size` of exactly zero would never advance the integrator.
    #[error("step_size must be non-zero")]
    ZeroStep,

    /// The engine needs somewhere to write its trajectory.
    #[error("output_path must not be empty")]
    EmptyOutputPath,
}

/// All errors that can arise from loading or saving bridge settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings file did not exist at the expected path.
    #[error("settings not found at {path}")]
    NotFound { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source,
    }
}
