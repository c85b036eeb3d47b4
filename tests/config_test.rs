// tests/config_test.rs
use std::io::Write;

use release_gate::config::{load_config, Config};
use serial_test::serial;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.changelog, "CHANGELOG.md");
    assert_eq!(config.manifest, "package.json");
    assert_eq!(config.dist_dir, "dist");
    assert_eq!(config.remote, "origin");
    assert_eq!(config.branch, "main");
    assert!(config.package_command.is_empty());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
name = "acme-ui"
base_version = "1.4.0"
changelog = "docs/CHANGELOG.md"
package_command = ["npm", "run", "package", "--", "{version}"]
publish_command = ["npm", "publish", "{archive}"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.name, "acme-ui");
    assert_eq!(config.base_version, "1.4.0");
    assert_eq!(config.changelog, "docs/CHANGELOG.md");
    // Unset fields keep their defaults
    assert_eq!(config.manifest, "package.json");
    assert_eq!(config.remote, "origin");
    assert_eq!(
        config.package_command,
        vec!["npm", "run", "package", "--", "{version}"]
    );
}

#[test]
fn test_load_rejects_malformed_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"name = [not toml").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(result.is_err());
}

#[test]
fn test_load_missing_explicit_path_is_error() {
    assert!(load_config(Some("/nonexistent/releasegate.toml")).is_err());
}

#[test]
#[serial]
fn test_load_finds_project_file_in_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("releasegate.toml"),
        "name = \"acme-ui\"\nbase_version = \"2.0.1\"\n",
    )
    .unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(previous).unwrap();

    let config = config.unwrap();
    assert_eq!(config.name, "acme-ui");
    assert_eq!(config.base_version, "2.0.1");
}

#[test]
fn test_validate_requires_name_and_base_version() {
    let config = Config::default();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("name"));
}

#[test]
fn test_validate_rejects_bad_package_name() {
    let mut config = Config::default();
    config.name = "Acme UI!".to_string();
    config.base_version = "1.4.0".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_accepts_registry_style_names() {
    for name in ["acme-ui", "acme_ui", "acme.ui", "a1"] {
        let mut config = Config::default();
        config.name = name.to_string();
        config.base_version = "1.4.0".to_string();
        assert!(config.validate().is_ok(), "expected '{}' to be valid", name);
    }
}
