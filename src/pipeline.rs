//! The release orchestrator.
//!
//! Linear happy path with terminal failure states:
//! gate → clean → package → publish → sync tags. Each step runs to
//! completion before the next begins, and the first failure aborts the whole
//! run. There is no rollback: packaging, publication, and tag sync are
//! append-only operations whose partial completion is manually recoverable.
//! Re-running the pipeline concurrently with itself is not guarded against.

use std::fs;
use std::path::Path;

use crate::artifacts::{PackageArtifacts, Packager, Publisher};
use crate::checks;
use crate::config::Config;
use crate::error::{ReleaseGateError, Result};
use crate::vcs::Vcs;
use crate::version::ReleaseVersion;

/// Read-only carrier threaded through every pipeline step.
///
/// Computed once before the first step and returned unchanged on success.
/// No step may depend on another step having modified it: it propagates
/// configuration, it does not accumulate state.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub config: Config,
    pub version: ReleaseVersion,
}

impl ReleaseContext {
    pub fn new(config: Config, version: ReleaseVersion) -> Self {
        ReleaseContext { config, version }
    }
}

/// Step 1: run the four precondition gates in their fixed order.
pub fn check_release_ready(ctx: &ReleaseContext, vcs: &dyn Vcs) -> Result<()> {
    checks::run_preconditions(vcs, &ctx.config, &ctx.version)
}

/// Step 2: clear any previous build output.
///
/// Idempotent: a missing dist directory is not an error. Leaves an empty
/// dist directory behind for the packaging step to fill.
pub fn clean(ctx: &ReleaseContext) -> Result<()> {
    let dist = Path::new(&ctx.config.dist_dir);
    if dist.exists() {
        fs::remove_dir_all(dist)?;
    }
    fs::create_dir_all(dist)?;
    Ok(())
}

/// Step 3: build the archive and provenance manifest.
///
/// Runs only after [clean]. The current commit hash is captured here and
/// handed to the packaging collaborator as provenance; the artifact paths
/// are derived from the library name and version, so the publish step needs
/// no extra state to find them.
pub fn package(
    ctx: &ReleaseContext,
    vcs: &dyn Vcs,
    packager: &dyn Packager,
) -> Result<PackageArtifacts> {
    let commit = vcs.current_commit_hash()?;
    packager.package(&ctx.config, &ctx.version, &commit)
}

/// Step 4: hand the artifacts to the publication collaborator.
pub fn publish(artifacts: &PackageArtifacts, publisher: &dyn Publisher) -> Result<()> {
    publisher.publish(&artifacts.archive, &artifacts.manifest)
}

/// Step 5: share the tag, then the branch.
///
/// Tag first: it is what the gate confirmed against HEAD, so it must reach
/// the remote even when the branch push fails afterwards. This step only
/// runs after publication, so a failure here means "push manually", never
/// "republish".
pub fn sync_tags(ctx: &ReleaseContext, vcs: &dyn Vcs) -> Result<()> {
    for refname in [ctx.version.tag(), ctx.config.branch.clone()] {
        let status = vcs
            .push_ref(&ctx.config.remote, &refname)
            .map_err(|e| ReleaseGateError::sync(e.to_string()))?;
        if status != 0 {
            return Err(ReleaseGateError::sync(format!(
                "pushing {} to {} exited with status {}",
                refname, ctx.config.remote, status
            )));
        }
    }
    Ok(())
}

/// Run the whole pipeline.
///
/// # Returns
/// * `Ok(ReleaseContext)` - The context, unchanged, after every step
///   succeeded
/// * `Err` - The first failing step's error; earlier side effects stand
pub fn run_release(
    ctx: ReleaseContext,
    vcs: &dyn Vcs,
    packager: &dyn Packager,
    publisher: &dyn Publisher,
) -> Result<ReleaseContext> {
    check_release_ready(&ctx, vcs)?;
    clean(&ctx)?;
    let artifacts = package(&ctx, vcs, packager)?;
    publish(&artifacts, publisher)?;
    sync_tags(&ctx, vcs)?;
    Ok(ctx)
}
