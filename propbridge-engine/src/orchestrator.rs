//! Public entry point: config in, engine run out.
//!
//! `propagate` — strictly linear, each step finishes before the next:
//!
//! 1. Anchor a relative `output_path` (isolated mode only).
//! 2. Serialize config + request into the artifact text and hash it.
//! 3. Reserve an artifact slot (fresh run dir, or the locked shared path).
//! 4. Write the artifact, replacing any previous one.
//! 5. Run the engine in the slot's directory and wait.
//! 6. Optionally check the output file exists.
//! 7. Record the run; apply the cleanup policy.
//!
//! Any failure returns immediately and leaves the artifact on disk.

use std::path::{Path, PathBuf};

use chrono::Utc;

use propbridge_artifact::{self as artifact, ArtifactSlot};
use propbridge_core::{
    settings, ArtifactMode, ArtifactSettings, BridgeSettings, CleanupPolicy, PropagationConfig,
    PropagationRequest,
};

use crate::error::{EngineError, PropagateError};
use crate::invoker;
use crate::record::{self, RunRecord};

#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    settings: BridgeSettings,
}

impl Orchestrator {
    pub fn new(settings: BridgeSettings) -> Self {
        Self { settings }
    }

    /// Load `propbridge.yaml` from `path`, falling back to defaults if absent.
    pub fn from_settings_file(path: &Path) -> Result<Self, PropagateError> {
        Ok(Self::new(settings::load_or_default_at(path)?))
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Run the engine once for `config` and `request`.
    pub fn propagate(
        &self,
        config: &PropagationConfig,
        request: &PropagationRequest,
    ) -> Result<RunRecord, PropagateError> {
        let engine = invoker::resolve_executable(&self.settings.engine)?;
        let request = self.anchor_output(request)?;

        let text = artifact::serialize(config, &request);
        let sha = artifact::digest(&text);

        let slot = artifact::allocate(&self.settings.artifact)?;
        artifact::write(slot.artifact_path(), &text)?;
        tracing::info!(
            path = %slot.artifact_path().display(),
            sha256 = %sha,
            engine = %engine.display(),
            backward = request.is_backward(),
            perturbations = request.perturbations().is_enabled(),
            "invoking engine"
        );

        let started_at = Utc::now();
        let outcome = invoker::invoke(&engine, slot.working_dir()).map_err(|err| {
            tracing::error!(
                error = %err,
                artifact = %slot.artifact_path().display(),
                "engine run failed; artifact kept for inspection"
            );
            err
        })?;
        let finished_at = Utc::now();

        if self.settings.verify_output {
            let output = slot.working_dir().join(request.output_path());
            if !output.exists() {
                return Err(EngineError::MissingOutput { path: output }.into());
            }
        }

        let retain = self.settings.cleanup == CleanupPolicy::Retain;
        let record = RunRecord {
            mode: slot.mode(),
            artifact_path: slot.artifact_path().to_path_buf(),
            artifact_sha256: sha,
            working_dir: slot.working_dir().to_path_buf(),
            engine,
            output_path: request.output_path().to_path_buf(),
            exit_code: outcome.exit_code,
            started_at,
            finished_at,
            artifact_retained: retain,
        };

        if retain {
            if let Some(run_dir) = slot.run_dir() {
                record::save_at(run_dir, &record)?;
            }
        } else {
            discard(&slot)?;
        }

        tracing::info!(
            output = %record.output_path.display(),
            elapsed_ms = record.elapsed().num_milliseconds(),
            "propagation finished"
        );
        Ok(record)
    }

    /// Remove the artifact a retained run left behind.
    ///
    /// Fails with `ArtifactError::NotFound` if it is already gone.
    pub fn clean(&self, record: &RunRecord) -> Result<(), PropagateError> {
        match record.mode {
            ArtifactMode::Shared => {
                // Wait out any run currently using the shared path.
                let _slot = artifact::allocate(&ArtifactSettings {
                    mode: ArtifactMode::Shared,
                    root: record.working_dir.clone(),
                })?;
                artifact::remove(&record.artifact_path)?;
            }
            ArtifactMode::Isolated => {
                artifact::remove(&record.artifact_path)?;
                artifact::remove_run_dir(&record.working_dir)?;
            }
        }
        Ok(())
    }

    /// In isolated mode the engine runs inside a throwaway run directory, so a
    /// relative output path is re-rooted at the artifact root instead.
    fn anchor_output(&self, request: &PropagationRequest) -> Result<PropagationRequest, PropagateError> {
        let output = request.output_path();
        if self.settings.artifact.mode == ArtifactMode::Shared || output.is_absolute() {
            return Ok(request.clone());
        }
        let root = absolute(&self.settings.artifact.root)?;
        Ok(request.clone().with_output_path(root.join(output))?)
    }
}

fn discard(slot: &ArtifactSlot) -> Result<(), PropagateError> {
    artifact::remove(slot.artifact_path())?;
    if let Some(run_dir) = slot.run_dir() {
        artifact::remove_run_dir(run_dir)?;
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, PropagateError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(PropagateError::CurrentDir)?;
    Ok(cwd.join(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
