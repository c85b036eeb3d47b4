use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseGateError, Result};

/// Represents the complete configuration for release-gate.
///
/// Names the library being released and the upstream base version, the
/// documents the gate inspects, and the external commands that package and
/// publish the artifact.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Library identifier; artifact names are derived from it
    #[serde(default)]
    pub name: String,

    /// Upstream version this library wraps; releases are `base_version.N`
    #[serde(default)]
    pub base_version: String,

    /// Changelog document checked for the release tag
    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Package manifest checked for the bare release version
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Build output directory, cleared and repopulated on every release
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Command that builds the distributable archive; `{version}` expands
    /// to the release version
    #[serde(default)]
    pub package_command: Vec<String>,

    /// Command that uploads the artifact; `{archive}` and `{manifest}`
    /// expand to the artifact paths
    #[serde(default)]
    pub publish_command: Vec<String>,
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: String::new(),
            base_version: String::new(),
            changelog: default_changelog(),
            manifest: default_manifest(),
            dist_dir: default_dist_dir(),
            remote: default_remote(),
            branch: default_branch(),
            package_command: Vec::new(),
            publish_command: Vec::new(),
        }
    }
}

impl Config {
    /// Check the parts every command needs before any work starts.
    ///
    /// # Returns
    /// * `Ok(())` - Name and base version are present and well-formed
    /// * `Err` - Environment error describing what to fix in the config file
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.base_version.is_empty() {
            return Err(ReleaseGateError::environment(
                "releasegate.toml must set `name` and `base_version`",
            ));
        }

        if let Ok(re) = regex::Regex::new(r"^[a-z0-9][a-z0-9._-]*$") {
            if !re.is_match(&self.name) {
                return Err(ReleaseGateError::environment(format!(
                    "library name '{}' is not a valid package name",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasegate.toml` in current directory
/// 3. `releasegate.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releasegate.toml").exists() {
        fs::read_to_string("./releasegate.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("releasegate.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        ReleaseGateError::environment(format!("cannot parse configuration: {}", e))
    })?;
    Ok(config)
}
