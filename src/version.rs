use std::fmt;

use crate::error::{ReleaseGateError, Result};
use crate::vcs::Vcs;

/// Version of a release: a fixed upstream base plus the repository's
/// revision count.
///
/// The base names the upstream version this library wraps and only changes
/// when the upstream dependency does. The revision is the count of commits
/// reachable from the released commit, so it never decreases across history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    pub base: String,
    pub revision: u64,
}

impl ReleaseVersion {
    /// Create a version from a base and a revision count
    pub fn new(base: impl Into<String>, revision: u64) -> Self {
        ReleaseVersion {
            base: base.into(),
            revision,
        }
    }

    /// The tag name expected to mark the released commit (e.g. "v1.4.0.42")
    pub fn tag(&self) -> String {
        format!("v{}", self)
    }

    /// Version the next commit would carry.
    ///
    /// Used only to suggest what a new commit should be released as when a
    /// gate fails; never released directly.
    pub fn next(&self) -> ReleaseVersion {
        ReleaseVersion {
            base: self.base.clone(),
            revision: self.revision + 1,
        }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.base, self.revision)
    }
}

/// Compute the version for this invocation.
///
/// The base must be a valid semver version; the revision is the exact commit
/// count reported by the repository. Either failing is fatal: without a
/// version nothing downstream can run, so both map to environment errors.
///
/// # Arguments
/// * `vcs` - Repository to take the revision count from
/// * `base` - Configured upstream base version (e.g. "1.4.0")
///
/// # Returns
/// * `Ok(ReleaseVersion)` - The version this process will use throughout
/// * `Err` - If the base is not semver or the count cannot be obtained
pub fn resolve(vcs: &dyn Vcs, base: &str) -> Result<ReleaseVersion> {
    if semver::Version::parse(base).is_err() {
        return Err(ReleaseGateError::environment(format!(
            "base version '{}' is not a valid semver version",
            base
        )));
    }

    let revision = vcs.revision_count()?;
    Ok(ReleaseVersion::new(base, revision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::MockVcs;

    #[test]
    fn test_resolve_uses_revision_count_as_suffix() {
        for count in [0, 1, 42, 9000] {
            let mut vcs = MockVcs::new();
            vcs.set_revision_count(count);

            let version = resolve(&vcs, "1.4.0").unwrap();
            assert_eq!(version.revision, count);
            assert_eq!(version.to_string(), format!("1.4.0.{}", count));
            assert_eq!(version.next().revision, count + 1);
        }
    }

    #[test]
    fn test_resolve_rejects_non_semver_base() {
        let vcs = MockVcs::new();
        let result = resolve(&vcs, "1.4");
        match result {
            Err(ReleaseGateError::Environment(msg)) => assert!(msg.contains("1.4")),
            other => panic!("expected environment error, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let version = ReleaseVersion::new("1.4.0", 42);
        assert_eq!(version.to_string(), "1.4.0.42");
    }

    #[test]
    fn test_tag_uses_v_marker() {
        let version = ReleaseVersion::new("1.4.0", 42);
        assert_eq!(version.tag(), "v1.4.0.42");
    }

    #[test]
    fn test_next_keeps_base() {
        let version = ReleaseVersion::new("1.4.0", 42);
        let next = version.next();
        assert_eq!(next, ReleaseVersion::new("1.4.0", 43));
        assert_eq!(next.tag(), "v1.4.0.43");
    }
}
