use std::path::PathBuf;

use crate::error::{ReleaseGateError, Result};
use crate::process::{CommandResult, ProcessRunner};
use crate::vcs::Vcs;

/// Git backend that shells out to the system `git` binary
///
/// Every operation is one subprocess call. Queries capture both streams;
/// pushes pass them through so the operator sees git's own progress output.
pub struct SystemGit {
    runner: ProcessRunner,
}

impl SystemGit {
    /// Open the repository containing `path`.
    ///
    /// Performs one subprocess call to confirm the path is inside a work
    /// tree. Fails with an environment error when git is missing or the path
    /// is not part of a repository: no version can be computed from there,
    /// so nothing downstream can run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let git = SystemGit {
            runner: ProcessRunner::with_dir(path),
        };

        let result = git.query(&["rev-parse", "--is-inside-work-tree"])?;
        if !result.success() {
            let stderr = result.stderr.unwrap_or_default();
            if stderr.contains("not a git repository") {
                return Err(ReleaseGateError::environment("not inside a git repository"));
            }
            return Err(ReleaseGateError::environment(format!(
                "cannot open git repository: {}",
                stderr.trim()
            )));
        }

        Ok(git)
    }

    /// Run a git query, capturing both streams.
    ///
    /// A spawn failure (git binary missing) is an environment error; a
    /// non-zero exit is left in the result for the caller to interpret.
    fn query(&self, args: &[&str]) -> Result<CommandResult> {
        let mut argv = vec!["git"];
        argv.extend_from_slice(args);
        self.runner
            .run(&argv, true, true)
            .map_err(|e| ReleaseGateError::environment(format!("cannot run git: {}", e)))
    }

    /// Turn a failed query into an environment error naming the command.
    fn query_failed(args: &[&str], result: &CommandResult) -> ReleaseGateError {
        ReleaseGateError::environment(format!(
            "git {} failed with status {}: {}",
            args.join(" "),
            result.status,
            result.stderr.as_deref().unwrap_or("").trim()
        ))
    }
}

impl Vcs for SystemGit {
    fn revision_count(&self) -> Result<u64> {
        let args = ["rev-list", "--count", "HEAD"];
        let result = self.query(&args)?;
        if !result.success() {
            return Err(SystemGit::query_failed(&args, &result));
        }

        let stdout = result.stdout.unwrap_or_default();
        let count = stdout.trim();
        count.parse::<u64>().map_err(|_| {
            ReleaseGateError::environment(format!("unexpected revision count '{}'", count))
        })
    }

    fn current_commit_hash(&self) -> Result<String> {
        let args = ["rev-parse", "HEAD"];
        let result = self.query(&args)?;
        if !result.success() {
            return Err(SystemGit::query_failed(&args, &result));
        }
        Ok(result.stdout.unwrap_or_default().trim().to_string())
    }

    fn status(&self) -> Result<String> {
        let args = ["status", "--porcelain"];
        let result = self.query(&args)?;
        if !result.success() {
            return Err(SystemGit::query_failed(&args, &result));
        }
        Ok(result.stdout.unwrap_or_default())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        // `git tag --list` exits 0 whether or not the tag exists; existence
        // shows up as non-empty output.
        let args = ["tag", "--list", tag];
        let result = self.query(&args)?;
        if !result.success() {
            return Err(SystemGit::query_failed(&args, &result));
        }
        Ok(!result.stdout.unwrap_or_default().trim().is_empty())
    }

    fn describe_exact_tag_at_head(&self) -> Result<Option<String>> {
        // A non-zero exit here means "no exact tag at HEAD", which is an
        // answer rather than a failure.
        let result = self.query(&["describe", "--tags", "--exact-match", "HEAD"])?;
        if !result.success() {
            return Ok(None);
        }
        Ok(Some(result.stdout.unwrap_or_default().trim().to_string()))
    }

    fn push_ref(&self, remote: &str, refname: &str) -> Result<i32> {
        let result = self
            .runner
            .run(&["git", "push", remote, refname], false, false)
            .map_err(|e| ReleaseGateError::environment(format!("cannot run git push: {}", e)))?;
        Ok(result.status)
    }
}
