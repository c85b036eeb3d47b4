use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{ReleaseGateError, Result};

/// Outcome of running an external command.
///
/// Streams are `Some` only when the caller asked for them to be captured;
/// otherwise they went straight to the operator's terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit status of the process (-1 if it was terminated by a signal).
    pub status: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl CommandResult {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs external commands, blocking until they finish.
///
/// The child inherits the caller's environment, and the caller's working
/// directory unless one was set with [ProcessRunner::with_dir]. A non-zero
/// exit status is never turned into an error here: it is reported in the
/// result for the caller to inspect. There is no timeout; the commands this
/// tool runs are assumed to be local and fast, and an operator can always
/// interrupt the whole process.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// Create a runner that executes in the caller's working directory
    pub fn new() -> Self {
        ProcessRunner { dir: None }
    }

    /// Create a runner that executes in `dir` instead
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        ProcessRunner {
            dir: Some(dir.into()),
        }
    }

    /// Execute `argv` and wait for it to exit.
    ///
    /// # Arguments
    /// * `argv` - Program and arguments; must be non-empty
    /// * `capture_stdout` - Capture stdout instead of passing it through
    /// * `capture_stderr` - Capture stderr instead of passing it through
    ///
    /// # Returns
    /// * `Ok(CommandResult)` - Exit status plus any captured streams
    /// * `Err` - If `argv` is empty or the process could not be spawned
    pub fn run<S: AsRef<OsStr>>(
        &self,
        argv: &[S],
        capture_stdout: bool,
        capture_stderr: bool,
    ) -> Result<CommandResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ReleaseGateError::environment("cannot run an empty command line"))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd.stdout(if capture_stdout {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        cmd.stderr(if capture_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        let output = cmd.output()?;

        Ok(CommandResult {
            status: output.status.code().unwrap_or(-1),
            stdout: capture_stdout.then(|| String::from_utf8_lossy(&output.stdout).to_string()),
            stderr: capture_stderr.then(|| String::from_utf8_lossy(&output.stderr).to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_captures_stdout() {
        let runner = ProcessRunner::new();
        let result = runner.run(&["sh", "-c", "printf gate"], true, true).unwrap();
        assert_eq!(result.status, 0);
        assert!(result.success());
        assert_eq!(result.stdout.as_deref(), Some("gate"));
    }

    #[test]
    fn test_run_captures_stderr() {
        let runner = ProcessRunner::new();
        let result = runner
            .run(&["sh", "-c", "printf oops >&2"], true, true)
            .unwrap();
        assert_eq!(result.stderr.as_deref(), Some("oops"));
    }

    #[test]
    fn test_run_reports_nonzero_status() {
        let runner = ProcessRunner::new();
        let result = runner.run(&["sh", "-c", "exit 3"], true, true).unwrap();
        assert_eq!(result.status, 3);
        assert!(!result.success());
    }

    #[test]
    fn test_run_without_capture_leaves_streams_empty() {
        let runner = ProcessRunner::new();
        let result = runner.run(&["true"], false, false).unwrap();
        assert_eq!(result.stdout, None);
        assert_eq!(result.stderr, None);
    }

    #[test]
    fn test_run_empty_argv_is_error() {
        let runner = ProcessRunner::new();
        let argv: Vec<String> = Vec::new();
        assert!(runner.run(&argv, true, true).is_err());
    }

    #[test]
    fn test_run_missing_program_is_error() {
        let runner = ProcessRunner::new();
        assert!(runner
            .run(&["release-gate-no-such-program"], true, true)
            .is_err());
    }

    #[test]
    fn test_run_with_dir_overrides_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("marker.txt"), "").unwrap();

        let runner = ProcessRunner::with_dir(dir.path());
        let result = runner.run(&["ls"], true, true).unwrap();
        assert!(result.stdout.unwrap().contains("marker.txt"));
    }
}
