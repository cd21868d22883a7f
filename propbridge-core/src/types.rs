//! Small enumerated types shared across the bridge.
//!
//! Every two-valued switch is a real enum here; the literal strings only
//! appear at the artifact and settings boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Perturbations
// ---------------------------------------------------------------------------

/// Whether the engine should add perturbation forces on top of two-body motion.
///
/// Rendered as `true` / `false` in the artifact's `add_pertubations` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Perturbations {
    #[default]
    Enabled,
    Disabled,
}

impl Perturbations {
    pub fn is_enabled(self) -> bool {
        matches!(self, Perturbations::Enabled)
    }

    /// Literal used in the artifact.
    pub fn as_literal(self) -> &'static str {
        match self {
            Perturbations::Enabled => "true",
            Perturbations::Disabled => "false",
        }
    }
}

impl From<bool> for Perturbations {
    fn from(enabled: bool) -> Self {
        if enabled {
            Perturbations::Enabled
        } else {
            Perturbations::Disabled
        }
    }
}

impl fmt::Display for Perturbations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_literal())
    }
}

/// Error returned when a perturbation literal is neither `true` nor `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected `true` or `false`, got `{0}`")]
pub struct ParsePerturbationsError(pub String);

impl FromStr for Perturbations {
    type Err = ParsePerturbationsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Perturbations::Enabled),
            "false" => Ok(Perturbations::Disabled),
            other => Err(ParsePerturbationsError(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact placement and retention
// ---------------------------------------------------------------------------

/// Where artifacts are placed for each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactMode {
    /// A fresh run directory per invocation; concurrent runs never alias.
    #[default]
    Isolated,
    /// One conventional artifact under the root, guarded by a process-wide lock.
    Shared,
}

impl fmt::Display for ArtifactMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactMode::Isolated => write!(f, "isolated"),
            ArtifactMode::Shared => write!(f, "shared"),
        }
    }
}

/// What happens to the artifact once the engine exits successfully.
///
/// Failed runs always keep their artifact for diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    #[default]
    Retain,
    RemoveOnSuccess,
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupPolicy::Retain => write!(f, "retain"),
            CleanupPolicy::RemoveOnSuccess => write!(f, "remove_on_success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
