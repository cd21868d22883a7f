//! Where an artifact lives for one run.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   .env                                   (shared mode)
//!   runs/
//!     20240630T184510.123Z-4242-0000/      (isolated mode, one per run)
//!       .env
//!       run.json
//! ```
//!
//! The engine always reads `.env` from its working directory, so the slot's
//! working directory is the directory holding the artifact.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use propbridge_core::{ArtifactMode, ArtifactSettings};

use crate::error::{write_err, ArtifactError};

/// File name the engine looks for in its working directory.
pub const ARTIFACT_FILE_NAME: &str = ".env";

/// Subdirectory of the root that holds isolated run directories.
pub const RUNS_DIR_NAME: &str = "runs";

const MAX_ALLOCATION_ATTEMPTS: usize = 16;

/// Held for the whole write → engine exit span of a shared-mode run.
static SHARED_ARTIFACT_LOCK: Mutex<()> = Mutex::new(());

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A reserved artifact location. Dropping it releases the shared lock.
#[derive(Debug)]
pub struct ArtifactSlot {
    mode: ArtifactMode,
    working_dir: PathBuf,
    artifact_path: PathBuf,
    _guard: Option<MutexGuard<'static, ()>>,
}

impl ArtifactSlot {
    pub fn mode(&self) -> ArtifactMode {
        self.mode
    }

    /// Directory the engine must run in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// The per-run directory, if this slot owns one.
    pub fn run_dir(&self) -> Option<&Path> {
        match self.mode {
            ArtifactMode::Isolated => Some(&self.working_dir),
            ArtifactMode::Shared => None,
        }
    }
}

/// Reserve a location according to `settings`.
///
/// Shared mode blocks until no other slot in this process holds the shared
/// artifact. Isolated mode creates a fresh run directory.
pub fn allocate(settings: &ArtifactSettings) -> Result<ArtifactSlot, ArtifactError> {
    match settings.mode {
        ArtifactMode::Shared => {
            let guard = SHARED_ARTIFACT_LOCK
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let working_dir = settings.root.clone();
            Ok(ArtifactSlot {
                mode: ArtifactMode::Shared,
                artifact_path: working_dir.join(ARTIFACT_FILE_NAME),
                working_dir,
                _guard: Some(guard),
            })
        }
        ArtifactMode::Isolated => {
            let run_dir = create_run_dir(&settings.root)?;
            Ok(ArtifactSlot {
                mode: ArtifactMode::Isolated,
                artifact_path: run_dir.join(ARTIFACT_FILE_NAME),
                working_dir: run_dir,
                _guard: None,
            })
        }
    }
}

fn create_run_dir(root: &Path) -> Result<PathBuf, ArtifactError> {
    let runs = root.join(RUNS_DIR_NAME);
    std::fs::create_dir_all(&runs).map_err(|e| write_err(&runs, e))?;

    let mut last_err = None;
    for _ in 0..MAX_ALLOCATION_ATTEMPTS {
        let name = format!(
            "{}-{}-{:04}",
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ"),
            std::process::id(),
            RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        );
        let dir = runs.join(name);
        // create_dir (not create_dir_all) fails if another run got there first.
        match std::fs::create_dir(&dir) {
            Ok(()) => {
                tracing::debug!(path = %dir.display(), "allocated run directory");
                return Ok(dir);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => last_err = Some((dir, e)),
            Err(e) => return Err(write_err(&dir, e)),
        }
    }
    let (dir, e) = last_err.unwrap_or_else(|| {
        (
            runs.clone(),
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "no run directory available"),
        )
    });
    Err(write_err(dir, e))
}

/// Delete an isolated run directory and everything in it.
pub fn remove_run_dir(run_dir: &Path) -> Result<(), ArtifactError> {
    match std::fs::remove_dir_all(run_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::NotFound {
            path: run_dir.to_path_buf(),
        }),
        Err(e) => Err(write_err(run_dir, e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn settings(mode: ArtifactMode, root: &Path) -> ArtifactSettings {
        ArtifactSettings {
            mode,
            root: root.to_path_buf(),
        }
    }

    #[test]
    fn isolated_slots_never_alias() {
        let tmp = TempDir::new().unwrap();
        let s = settings(ArtifactMode::Isolated, tmp.path());
        let a = allocate(&s).unwrap();
        let b = allocate(&s).unwrap();
        assert_ne!(a.artifact_path(), b.artifact_path());
        assert!(a.working_dir().is_dir());
        assert_eq!(a.artifact_path(), a.working_dir().join(".env"));
        assert!(a.working_dir().starts_with(tmp.path().join("runs")));
        assert_eq!(a.run_dir(), Some(a.working_dir()));
    }

    #[test]
    fn shared_slot_uses_conventional_path() {
        let tmp = TempDir::new().unwrap();
        let slot = allocate(&settings(ArtifactMode::Shared, tmp.path())).unwrap();
        assert_eq!(slot.artifact_path(), tmp.path().join(".env"));
        assert_eq!(slot.working_dir(), tmp.path());
        assert!(slot.run_dir().is_none());
    }

    #[test]
    fn shared_slot_blocks_second_holder_until_dropped() {
        let tmp = TempDir::new().unwrap();
        let s = settings(ArtifactMode::Shared, tmp.path());
        let first = allocate(&s).unwrap();

        let acquired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&acquired);
        let s2 = s.clone();
        let handle = thread::spawn(move || {
            let _second = allocate(&s2).unwrap();
            flag.store(true, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(150));
        assert!(!acquired.load(Ordering::SeqCst), "second slot acquired while first held");

        drop(first);
        handle.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
    }

    #[test]
    fn remove_run_dir_is_strict_about_absence() {
        let tmp = TempDir::new().unwrap();
        let slot = allocate(&settings(ArtifactMode::Isolated, tmp.path())).unwrap();
        let dir = slot.working_dir().to_path_buf();
        remove_run_dir(&dir).expect("remove");
        assert!(!dir.exists());
        assert!(matches!(remove_run_dir(&dir), Err(ArtifactError::NotFound { .. })));
    }
}
