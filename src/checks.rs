//! Precondition gates run before any artifact is produced.
//!
//! The four gates run in a fixed order and the first failure aborts the
//! whole pipeline with its reserved exit code. Order matters: the document
//! gates come before the clean-tree gate so the operator can still edit the
//! changelog or manifest and retry, and the tag gate runs last because it
//! assumes everything else already holds.
//!
//! No gate is ever retried within a run; remediation is manual (edit a
//! document, commit, or tag) followed by re-invocation.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{ReleaseGateError, Result};
use crate::vcs::Vcs;
use crate::version::ReleaseVersion;

/// Exit code when the changelog has no entry for the release.
pub const EXIT_CHANGELOG_STALE: i32 = 10;
/// Exit code when the manifest does not carry the release version.
pub const EXIT_MANIFEST_STALE: i32 = 11;
/// Exit code when the working tree has uncommitted changes.
pub const EXIT_TREE_DIRTY: i32 = 12;
/// Exit code when the release tag does not exist.
pub const EXIT_TAG_MISSING: i32 = 13;
/// Exit code when the release tag exists but is not on HEAD.
pub const EXIT_TAG_NOT_ON_HEAD: i32 = 14;

/// Run all four gates in order, stopping at the first failure.
pub fn run_preconditions(
    vcs: &dyn Vcs,
    config: &Config,
    version: &ReleaseVersion,
) -> Result<()> {
    changelog_updated(Path::new(&config.changelog), version)?;
    manifest_version_updated(Path::new(&config.manifest), version)?;
    working_tree_clean(vcs)?;
    tag_on_head(vcs, version)?;
    Ok(())
}

/// Gate 1: the changelog must mention the release tag.
pub fn changelog_updated(path: &Path, version: &ReleaseVersion) -> Result<()> {
    let text = read_document(path, EXIT_CHANGELOG_STALE, "changelog")?;
    if text.contains(&version.tag()) {
        return Ok(());
    }

    Err(ReleaseGateError::blocked(
        EXIT_CHANGELOG_STALE,
        format!(
            "{} has no entry for {}; document this release as {}, or as {} if you intend to add another commit",
            path.display(),
            version.tag(),
            version.tag(),
            version.next().tag()
        ),
    ))
}

/// Gate 2: the manifest must carry the bare release version.
///
/// Manifests do not use the tag marker, so this looks for the version
/// string itself, not the tag.
pub fn manifest_version_updated(path: &Path, version: &ReleaseVersion) -> Result<()> {
    let text = read_document(path, EXIT_MANIFEST_STALE, "manifest")?;
    if text.contains(&version.to_string()) {
        return Ok(());
    }

    Err(ReleaseGateError::blocked(
        EXIT_MANIFEST_STALE,
        format!(
            "{} does not carry version {}; set it to {}, or to {} if you intend to add another commit",
            path.display(),
            version,
            version,
            version.next()
        ),
    ))
}

/// Gate 3: the working tree must have no uncommitted changes.
///
/// The raw status output is embedded in the failure so the operator sees
/// exactly what is dirty.
pub fn working_tree_clean(vcs: &dyn Vcs) -> Result<()> {
    let status = vcs.status()?;
    if status.trim().is_empty() {
        return Ok(());
    }

    Err(ReleaseGateError::blocked(
        EXIT_TREE_DIRTY,
        format!(
            "working tree is not clean; commit or stash before releasing:\n{}",
            status.trim_end()
        ),
    ))
}

/// Gate 4: the release tag must exist and point exactly at HEAD.
///
/// Runs last: it assumes the documents are correct and the tree is clean,
/// and it is the final confirmation that the tagged commit is the one being
/// released before anything irreversible happens.
pub fn tag_on_head(vcs: &dyn Vcs, version: &ReleaseVersion) -> Result<()> {
    let tag = version.tag();
    if !vcs.tag_exists(&tag)? {
        return Err(ReleaseGateError::blocked(
            EXIT_TAG_MISSING,
            format!(
                "tag {} does not exist; create it on the release commit (`git tag {}`), or tag {} after adding another commit",
                tag,
                tag,
                version.next().tag()
            ),
        ));
    }

    match vcs.describe_exact_tag_at_head()? {
        Some(found) if found == tag => Ok(()),
        Some(found) => Err(ReleaseGateError::blocked(
            EXIT_TAG_NOT_ON_HEAD,
            format!(
                "HEAD is tagged {} but this release expects {}; move the tag, or release as {} after committing",
                found,
                tag,
                version.next().tag()
            ),
        )),
        None => Err(ReleaseGateError::blocked(
            EXIT_TAG_NOT_ON_HEAD,
            format!(
                "tag {} exists but does not point at HEAD; move it (`git tag -f {}`), or tag {} after committing",
                tag,
                tag,
                version.next().tag()
            ),
        )),
    }
}

fn read_document(path: &Path, code: i32, what: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ReleaseGateError::blocked(
            code,
            format!("cannot read {} {}: {}", what, path.display(), e),
        )
    })
}
