//! Per-invocation run parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::finite;
use crate::error::ValidationError;
use crate::types::Perturbations;

/// Time window, step and output target for a single engine run.
///
/// `end_time` may precede `start_time`; backward propagation is the
/// engine's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PropagationRequestDef")]
pub struct PropagationRequest {
    start_time: f64,
    end_time: f64,
    step_size: f64,
    output_path: PathBuf,
    perturbations: Perturbations,
}

impl PropagationRequest {
    /// Perturbations default to enabled.
    pub fn new(
        start_time: f64,
        end_time: f64,
        step_size: f64,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let output_path = output_path.into();
        if output_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputPath);
        }
        let step_size = finite("step_size", step_size)?;
        if step_size == 0.0 {
            return Err(ValidationError::ZeroStep);
        }
        Ok(Self {
            start_time: finite("start_time", start_time)?,
            end_time: finite("end_time", end_time)?,
            step_size,
            output_path,
            perturbations: Perturbations::default(),
        })
    }

    pub fn with_perturbations(mut self, perturbations: impl Into<Perturbations>) -> Self {
        self.perturbations = perturbations.into();
        self
    }

    /// Same request, different output target. Used when the caller's relative
    /// path has to be anchored before the engine's working directory changes.
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        let output_path = output_path.into();
        if output_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputPath);
        }
        self.output_path = output_path;
        Ok(self)
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn perturbations(&self) -> Perturbations {
        self.perturbations
    }

    /// True when the window runs backwards in time.
    pub fn is_backward(&self) -> bool {
        self.end_time < self.start_time
    }
}

#[derive(Debug, Deserialize)]
struct PropagationRequestDef {
    start_time: f64,
    end_time: f64,
    step_size: f64,
    output_path: PathBuf,
    #[serde(default)]
    perturbations: Perturbations,
}

impl TryFrom<PropagationRequestDef> for PropagationRequest {
    type Error = ValidationError;

    fn try_from(def: PropagationRequestDef) -> Result<Self, Self::Error> {
        Ok(
            PropagationRequest::new(def.start_time, def.end_time, def.step_size, def.output_path)?
                .with_perturbations(def.perturbations),
        )
    }
}
