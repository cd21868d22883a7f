//! Artifact file lifecycle: replace-on-write and strict removal.
//!
//! ## `write` — delete-then-create
//!
//! 1. Text is fully rendered by the caller before this runs.
//! 2. Ensure the parent directory exists.
//! 3. If a file is already at `path`, delete it.
//! 4. Create `path` and write the text.
//!
//! This is not an atomic rename: a crash between 3 and 4 leaves `path`
//! absent or partially written. The engine reads a fixed file name in its
//! working directory, so there is no second name to rename from.

use std::path::{Path, PathBuf};

use crate::error::{write_err, ArtifactError};

/// Outcome of an artifact write; doubles as the confirmation signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Nothing was at the path before.
    Created { path: PathBuf },
    /// A previous artifact was deleted and replaced.
    Replaced { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Created { path } | WriteResult::Replaced { path } => path,
        }
    }
}

/// Write `text` to `path`, deleting whatever artifact was there first.
pub fn write(path: &Path, text: &str) -> Result<WriteResult, ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }

    let replaced = match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(write_err(path, e)),
    };

    std::fs::write(path, text).map_err(|e| write_err(path, e))?;

    let path = path.to_path_buf();
    if replaced {
        tracing::info!(path = %path.display(), "artifact replaced");
        Ok(WriteResult::Replaced { path })
    } else {
        tracing::info!(path = %path.display(), "artifact created");
        Ok(WriteResult::Created { path })
    }
}

/// Delete the artifact at `path`.
///
/// Absence is an error ([`ArtifactError::NotFound`]); callers wanting
/// idempotent cleanup match on it.
pub fn remove(path: &Path) -> Result<(), ArtifactError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "artifact removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(write_err(path, e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_write_returns_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        let result = write(&path, "area=10\n").unwrap();
        assert_eq!(result, WriteResult::Created { path: path.clone() });
        assert_eq!(fs::read_to_string(&path).unwrap(), "area=10\n");
    }

    #[test]
    fn second_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        write(&path, "v1 that is longer than the second\n").unwrap();
        let result = write(&path, "v2\n").unwrap();
        assert!(matches!(result, WriteResult::Replaced { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2\n");

        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "exactly one artifact on disk");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("runs").join("a").join(".env");
        write(&path, "x=1\n").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn remove_existing_then_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        write(&path, "x=1\n").unwrap();

        remove(&path).expect("first remove");
        assert!(!path.exists());

        let err = remove(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }), "got: {err}");
    }

    #[test]
    fn write_under_a_regular_file_is_a_write_error() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("not-a-dir");
        fs::write(&blocker, "occupied").unwrap();

        let err = write(&blocker.join(".env"), "x=1\n").unwrap_err();

        assert!(matches!(err, ArtifactError::Write { .. }), "got: {err}");
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "occupied");
    }
}
