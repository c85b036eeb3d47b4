//! Version-control abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations the release pipeline depends on, allowing for a real
//! implementation over the system `git` binary and a mock implementation for
//! testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Vcs] trait, which defines the narrow set
//! of operations release-gate needs. The concrete implementations include:
//!
//! - [system::SystemGit]: A real implementation that shells out to `git`
//! - [mock::MockVcs]: A mock implementation for testing
//!
//! Most code should depend on the [Vcs] trait rather than concrete
//! implementations so the orchestration logic can be exercised without
//! spawning processes.

pub mod mock;
pub mod system;

pub use mock::MockVcs;
pub use system::SystemGit;

use crate::error::Result;

/// Version-control operations used by the release pipeline
///
/// Every method is a blocking call that runs the underlying query to
/// completion before returning. Implementors must be `Send + Sync`.
///
/// Failures that prevent the query from running at all (no repository, no
/// git binary) are environment errors; a query that ran but answered "no"
/// is expressed in the return value, never as an error.
pub trait Vcs: Send + Sync {
    /// Exact count of commits reachable from the current position.
    ///
    /// Forms the revision suffix of the release version, so it must be a
    /// precise integer count, not an approximation.
    fn revision_count(&self) -> Result<u64>;

    /// Full hash of the commit currently checked out.
    ///
    /// Recorded as provenance metadata in the packaged artifact.
    fn current_commit_hash(&self) -> Result<String>;

    /// Raw status output for the working tree; empty when clean.
    ///
    /// The output is surfaced verbatim to the operator when the clean-tree
    /// gate fails, so implementations should not reformat it.
    fn status(&self) -> Result<String>;

    /// Whether `tag` exists anywhere in the repository history.
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// The exact tag pointing at the current position, if any.
    ///
    /// Returns `Ok(None)` when the current commit carries no exact tag;
    /// that is an answer, not an error.
    fn describe_exact_tag_at_head(&self) -> Result<Option<String>>;

    /// Push a tag or branch ref to `remote`.
    ///
    /// # Returns
    /// * `Ok(status)` - The push command's exit status; non-zero means the
    ///   push failed and the caller decides what that implies
    /// * `Err` - If the push command could not be run at all
    fn push_ref(&self, remote: &str, refname: &str) -> Result<i32>;
}
