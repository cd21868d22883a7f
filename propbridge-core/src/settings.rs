//! Bridge settings stored as YAML.
//!
//! # File layout
//!
//! ```text
//! <dir>/
//!   propbridge.yaml
//! ```
//!
//! ```yaml
//! engine: ./target/release/pertubation_propagator
//! artifact:
//!   mode: isolated
//!   root: .
//! cleanup: retain
//! verify_output: false
//! ```
//!
//! Every field is optional on load; missing ones take [`BridgeSettings::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, SettingsError};
use crate::types::{ArtifactMode, CleanupPolicy};

/// Conventional settings file name inside a project directory.
pub const SETTINGS_FILE_NAME: &str = "propbridge.yaml";

/// Where a release build of the engine lands by default.
pub const DEFAULT_ENGINE_PATH: &str = "./target/release/pertubation_propagator";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Artifact placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactSettings {
    pub mode: ArtifactMode,
    /// Base directory: holds the shared artifact, or the `runs/` tree.
    pub root: PathBuf,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            mode: ArtifactMode::default(),
            root: PathBuf::from("."),
        }
    }
}

/// Everything the orchestrator needs besides the per-run inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Path to the engine executable.
    pub engine: PathBuf,
    pub artifact: ArtifactSettings,
    pub cleanup: CleanupPolicy,
    /// Require the engine's output file to exist after a zero exit.
    pub verify_output: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            engine: PathBuf::from(DEFAULT_ENGINE_PATH),
            artifact: ArtifactSettings::default(),
            cleanup: CleanupPolicy::default(),
            verify_output: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// `<dir>/propbridge.yaml` — pure, no I/O.
pub fn settings_path_at(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE_NAME)
}

/// Load settings from `path`.
///
/// Returns `SettingsError::NotFound` if absent,
/// `SettingsError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<BridgeSettings, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Like [`load_at`], but a missing file yields the defaults.
pub fn load_or_default_at(path: &Path) -> Result<BridgeSettings, SettingsError> {
    match load_at(path) {
        Err(SettingsError::NotFound { .. }) => Ok(BridgeSettings::default()),
        other => other,
    }
}

/// Atomically save settings to `path`.
///
/// Write flow: serialize → `.tmp` sibling → `rename`.
pub fn save_at(path: &Path, settings: &BridgeSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| SETTINGS_FILE_NAME.to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_points_at_release_engine() {
        let settings = BridgeSettings::default();
        assert_eq!(settings.engine, PathBuf::from(DEFAULT_ENGINE_PATH));
        assert_eq!(settings.artifact.root, PathBuf::from("."));
        assert!(!settings.verify_output);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "artifact:\n  mode: shared\n";
        let settings: BridgeSettings = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(settings.artifact.mode, ArtifactMode::Shared);
        assert_eq!(settings.artifact.root, PathBuf::from("."));
        assert_eq!(settings.cleanup, CleanupPolicy::Retain);
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let settings = load_or_default_at(&settings_path_at(tmp.path())).expect("defaults");
        assert_eq!(settings, BridgeSettings::default());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = settings_path_at(tmp.path());
        let settings = BridgeSettings {
            engine: PathBuf::from("/opt/engine/bin/propagate"),
            artifact: ArtifactSettings {
                mode: ArtifactMode::Shared,
                root: tmp.path().to_path_buf(),
            },
            cleanup: CleanupPolicy::RemoveOnSuccess,
            verify_output: true,
        };
        save_at(&path, &settings).expect("save");
        assert_eq!(load_at(&path).expect("load"), settings);
    }
}
