//! Packaging and publication collaborators.
//!
//! The pipeline never builds or uploads artifacts itself; it delegates to
//! the [Packager] and [Publisher] traits. The command-backed implementations
//! run whatever the configuration names, so the actual packaging tool and
//! registry client stay outside this crate.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ReleaseGateError, Result};
use crate::process::ProcessRunner;
use crate::version::ReleaseVersion;

/// Provenance descriptor written next to every packaged archive.
///
/// Records, at minimum, the source commit the archive was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub name: String,
    pub version: String,
    /// Full hash of the commit the archive was built from
    pub commit: String,
}

/// Paths of the artifacts a packaging run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifacts {
    pub archive: PathBuf,
    pub manifest: PathBuf,
}

/// Where the archive for `name`/`version` lives under `dist_dir`.
///
/// Derived purely from the library identifier and the version so the publish
/// step can locate the artifact without any extra state.
pub fn archive_path(dist_dir: &Path, name: &str, version: &ReleaseVersion) -> PathBuf {
    dist_dir.join(format!("{}-{}.tar.gz", name, version))
}

/// Where the provenance manifest for `name`/`version` lives under `dist_dir`.
pub fn manifest_path(dist_dir: &Path, name: &str, version: &ReleaseVersion) -> PathBuf {
    dist_dir.join(format!("{}-{}.json", name, version))
}

/// Builds the distributable archive and its provenance manifest.
pub trait Packager: Send + Sync {
    /// Produce the artifacts for `version`, recording `commit` as provenance.
    fn package(
        &self,
        config: &Config,
        version: &ReleaseVersion,
        commit: &str,
    ) -> Result<PackageArtifacts>;
}

/// Uploads a packaged archive to the package repository.
///
/// A publish is a single best-effort attempt; the supported recovery after a
/// failure is re-running the whole pipeline. Handling a version that was
/// already published is the remote registry's responsibility: it must either
/// reject the duplicate or accept it idempotently.
pub trait Publisher: Send + Sync {
    fn publish(&self, archive: &Path, manifest: &Path) -> Result<()>;
}

/// Packager that delegates the archive build to the configured command.
///
/// Runs `package_command` with `{version}` expanded, expects the archive at
/// the derived path, then writes the provenance manifest beside it.
#[derive(Default)]
pub struct CommandPackager {
    runner: ProcessRunner,
}

impl CommandPackager {
    pub fn new() -> Self {
        CommandPackager {
            runner: ProcessRunner::new(),
        }
    }
}

impl Packager for CommandPackager {
    fn package(
        &self,
        config: &Config,
        version: &ReleaseVersion,
        commit: &str,
    ) -> Result<PackageArtifacts> {
        if config.package_command.is_empty() {
            return Err(ReleaseGateError::package_failed(
                1,
                "no package_command configured",
            ));
        }

        let argv = expand(
            &config.package_command,
            &[("{version}", &version.to_string())],
        );
        let result = self.runner.run(&argv, false, false)?;
        if !result.success() {
            return Err(ReleaseGateError::package_failed(
                result.status,
                format!("`{}` exited with status {}", argv.join(" "), result.status),
            ));
        }

        let dist = Path::new(&config.dist_dir);
        let archive = archive_path(dist, &config.name, version);
        if !archive.exists() {
            return Err(ReleaseGateError::package_failed(
                1,
                format!("packaging did not produce {}", archive.display()),
            ));
        }

        let provenance = Provenance {
            name: config.name.clone(),
            version: version.to_string(),
            commit: commit.to_string(),
        };
        let json = serde_json::to_string_pretty(&provenance).map_err(|e| {
            ReleaseGateError::package_failed(1, format!("cannot serialize provenance: {}", e))
        })?;

        let manifest = manifest_path(dist, &config.name, version);
        fs::write(&manifest, json)?;

        Ok(PackageArtifacts { archive, manifest })
    }
}

/// Publisher that hands the artifact to the configured upload command.
pub struct CommandPublisher {
    command: Vec<String>,
    runner: ProcessRunner,
}

impl CommandPublisher {
    /// Create a publisher around `command`; `{archive}` and `{manifest}`
    /// placeholders expand to the artifact paths when it runs
    pub fn new(command: Vec<String>) -> Self {
        CommandPublisher {
            command,
            runner: ProcessRunner::new(),
        }
    }
}

impl Publisher for CommandPublisher {
    fn publish(&self, archive: &Path, manifest: &Path) -> Result<()> {
        if self.command.is_empty() {
            return Err(ReleaseGateError::publish_failed(
                1,
                "no publish_command configured",
            ));
        }

        let argv = expand(
            &self.command,
            &[
                ("{archive}", &archive.display().to_string()),
                ("{manifest}", &manifest.display().to_string()),
            ],
        );
        let result = self.runner.run(&argv, false, false)?;
        if !result.success() {
            return Err(ReleaseGateError::publish_failed(
                result.status,
                format!("`{}` exited with status {}", argv.join(" "), result.status),
            ));
        }

        Ok(())
    }
}

fn expand(argv: &[String], substitutions: &[(&str, &str)]) -> Vec<String> {
    argv.iter()
        .map(|arg| {
            let mut arg = arg.clone();
            for (placeholder, value) in substitutions {
                arg = arg.replace(placeholder, value);
            }
            arg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version() -> ReleaseVersion {
        ReleaseVersion::new("1.4.0", 42)
    }

    #[test]
    fn test_artifact_paths_are_derived_from_name_and_version() {
        let dist = Path::new("dist");
        assert_eq!(
            archive_path(dist, "acme-ui", &version()),
            PathBuf::from("dist/acme-ui-1.4.0.42.tar.gz")
        );
        assert_eq!(
            manifest_path(dist, "acme-ui", &version()),
            PathBuf::from("dist/acme-ui-1.4.0.42.json")
        );
    }

    #[test]
    fn test_expand_substitutes_placeholders() {
        let argv = vec!["publish".to_string(), "{archive}".to_string()];
        let expanded = expand(&argv, &[("{archive}", "dist/a.tar.gz")]);
        assert_eq!(expanded, vec!["publish", "dist/a.tar.gz"]);
    }

    #[test]
    fn test_command_packager_writes_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("dist");
        let archive = archive_path(&dist, "acme-ui", &version());

        let mut config = Config::default();
        config.name = "acme-ui".to_string();
        config.base_version = "1.4.0".to_string();
        config.dist_dir = dist.display().to_string();
        config.package_command = vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("mkdir -p {} && touch {}", dist.display(), archive.display()),
        ];

        let artifacts = CommandPackager::new()
            .package(&config, &version(), "abc123")
            .unwrap();

        assert_eq!(artifacts.archive, archive);
        let written = fs::read_to_string(&artifacts.manifest).unwrap();
        let provenance: Provenance = serde_json::from_str(&written).unwrap();
        assert_eq!(provenance.name, "acme-ui");
        assert_eq!(provenance.version, "1.4.0.42");
        assert_eq!(provenance.commit, "abc123");
    }

    #[test]
    fn test_command_packager_propagates_exit_status() {
        let mut config = Config::default();
        config.name = "acme-ui".to_string();
        config.package_command = vec!["sh".to_string(), "-c".to_string(), "exit 7".to_string()];

        let err = CommandPackager::new()
            .package(&config, &version(), "abc123")
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_command_packager_requires_configured_command() {
        let config = Config::default();
        let err = CommandPackager::new()
            .package(&config, &version(), "abc123")
            .unwrap_err();
        assert!(err.to_string().contains("package_command"));
    }

    #[test]
    fn test_command_packager_requires_archive_to_appear() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.name = "acme-ui".to_string();
        config.dist_dir = dir.path().join("dist").display().to_string();
        config.package_command = vec!["true".to_string()];

        let err = CommandPackager::new()
            .package(&config, &version(), "abc123")
            .unwrap_err();
        assert!(err.to_string().contains("did not produce"));
    }

    #[test]
    fn test_command_publisher_success_and_failure() {
        let ok = CommandPublisher::new(vec!["true".to_string()]);
        assert!(ok
            .publish(Path::new("a.tar.gz"), Path::new("a.json"))
            .is_ok());

        let failing = CommandPublisher::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "exit 9".to_string(),
        ]);
        let err = failing
            .publish(Path::new("a.tar.gz"), Path::new("a.json"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 9);
    }
}
