//! Blocking launch of the external propagation engine.
//!
//! The engine takes no arguments: it reads `.env` from its working directory
//! and writes the trajectory to the `output_file` named there. The calling
//! thread waits for it unconditionally; there is no timeout.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{EngineError, PropagateError};

/// A run that exited with status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `executable` in `working_dir` and wait for it to exit.
///
/// Only a zero exit status is `Ok`; everything else is an [`EngineError`].
pub fn invoke(executable: &Path, working_dir: &Path) -> Result<EngineOutcome, EngineError> {
    tracing::debug!(
        engine = %executable.display(),
        cwd = %working_dir.display(),
        "launching engine"
    );
    let output = Command::new(executable)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| EngineError::Launch {
            path: executable.to_path_buf(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stdout.is_empty() {
        tracing::debug!(stdout = %stdout, "engine stdout");
    }
    if !stderr.is_empty() {
        tracing::debug!(stderr = %stderr, "engine stderr");
    }

    match output.status.code() {
        Some(0) => Ok(EngineOutcome {
            exit_code: 0,
            stdout,
            stderr,
        }),
        Some(code) => Err(EngineError::Failed { code, stderr }),
        None => Err(EngineError::Terminated {
            status: output.status.to_string(),
        }),
    }
}

/// Anchor a relative executable path to the caller's directory.
///
/// The engine runs with a different working directory, so `./target/...`
/// would otherwise be looked up from the wrong place. Bare names such as
/// `propagator` are left alone for `PATH` lookup.
pub fn resolve_executable(executable: &Path) -> Result<PathBuf, PropagateError> {
    if executable.is_absolute() || executable.components().count() < 2 {
        return Ok(executable.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(PropagateError::CurrentDir)?;
    Ok(cwd.join(executable))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Write an executable shell script named `name` into `dir`.
    #[cfg(unix)]
    pub(crate) fn stub_engine(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        {
            let mut file = fs::File::create(&path).unwrap();
            write!(file, "#!/bin/sh\n{body}\n").unwrap();
            file.sync_all().unwrap();
        }
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn zero_exit_is_ok_and_captures_stdout() {
        let tmp = TempDir::new().unwrap();
        let engine = stub_engine(tmp.path(), "engine", "echo 'Propagation was successfully run'");
        let outcome = invoke(&engine, tmp.path()).expect("engine ok");
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout, "Propagation was successfully run");
    }

    #[test]
    #[cfg(unix)]
    fn nonzero_exit_is_failed_with_stderr() {
        let tmp = TempDir::new().unwrap();
        let engine = stub_engine(tmp.path(), "engine", "echo 'no .env' >&2\nexit 3");
        let err = invoke(&engine, tmp.path()).unwrap_err();
        match err {
            EngineError::Failed { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "no .env");
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn runs_in_the_given_working_directory() {
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join(".env"), "area=10\n").unwrap();
        let engine = stub_engine(tmp.path(), "engine", "cat .env");
        let outcome = invoke(&engine, &work).expect("engine ok");
        assert_eq!(outcome.stdout, "area=10");
    }

    #[test]
    #[cfg(unix)]
    fn signal_is_terminated() {
        let tmp = TempDir::new().unwrap();
        let engine = stub_engine(tmp.path(), "engine", "kill -9 $$");
        let err = invoke(&engine, tmp.path()).unwrap_err();
        assert!(matches!(err, EngineError::Terminated { .. }), "got: {err}");
    }

    #[test]
    fn missing_executable_is_launch_error() {
        let tmp = TempDir::new().unwrap();
        let err = invoke(&tmp.path().join("does-not-exist"), tmp.path()).unwrap_err();
        assert!(matches!(err, EngineError::Launch { .. }), "got: {err}");
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn resolve_leaves_bare_names_and_absolute_paths() {
        assert_eq!(
            resolve_executable(Path::new("propagator")).unwrap(),
            PathBuf::from("propagator")
        );
        let abs = std::env::temp_dir().join("engine");
        assert_eq!(resolve_executable(&abs).unwrap(), abs);
    }

    #[test]
    fn resolve_anchors_relative_paths_to_cwd() {
        let resolved = resolve_executable(Path::new("./target/release/pertubation_propagator")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("target/release/pertubation_propagator"));
    }
}
