//! What happened in one propagation run.
//!
//! Isolated runs persist this as `run.json` next to their artifact, so a
//! trajectory can always be traced back to the exact configuration text and
//! engine that produced it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use propbridge_core::ArtifactMode;

use crate::error::{record_err, PropagateError};

pub const RUN_RECORD_FILE_NAME: &str = "run.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub mode: ArtifactMode,
    pub artifact_path: PathBuf,
    /// SHA-256 of the artifact text handed to the engine.
    pub artifact_sha256: String,
    /// Directory the engine ran in.
    pub working_dir: PathBuf,
    pub engine: PathBuf,
    /// As written to `output_file`.
    pub output_path: PathBuf,
    pub exit_code: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// False once the cleanup policy has removed the artifact.
    pub artifact_retained: bool,
}

impl RunRecord {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Write `record` to `<dir>/run.json` and return that path.
pub fn save_at(dir: &Path, record: &RunRecord) -> Result<PathBuf, PropagateError> {
    let path = dir.join(RUN_RECORD_FILE_NAME);
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, json).map_err(|e| record_err(&path, e))?;
    Ok(path)
}

pub fn load_at(path: &Path) -> Result<RunRecord, PropagateError> {
    let contents = std::fs::read_to_string(path).map_err(|e| record_err(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn sample(dir: &Path) -> RunRecord {
        let started_at = Utc::now();
        RunRecord {
            mode: ArtifactMode::Isolated,
            artifact_path: dir.join(".env"),
            artifact_sha256: "ab".repeat(32),
            working_dir: dir.to_path_buf(),
            engine: PathBuf::from("/opt/engine"),
            output_path: PathBuf::from("/data/traj.txt"),
            exit_code: 0,
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
            artifact_retained: true,
        }
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let record = sample(tmp.path());
        let path = save_at(tmp.path(), &record).expect("save");
        assert_eq!(path, tmp.path().join("run.json"));
        assert_eq!(load_at(&path).expect("load"), record);
    }

    #[test]
    fn elapsed_is_finish_minus_start() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(sample(tmp.path()).elapsed().num_milliseconds(), 1500);
    }

    #[test]
    fn mode_serializes_snake_case() {
        let tmp = TempDir::new().unwrap();
        let json = serde_json::to_string(&sample(tmp.path())).unwrap();
        assert!(json.contains("\"mode\":\"isolated\""), "got: {json}");
    }

    #[test]
    fn load_missing_is_record_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_at(&tmp.path().join("run.json")).unwrap_err();
        assert!(matches!(err, PropagateError::Record { .. }), "got: {err}");
    }
}
