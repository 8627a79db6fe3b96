// tests/config_loading.rs

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use venvman::config::{load_and_validate, load_or_default};
use venvman::errors::VenvmanError;
use venvman_test_utils::builders::ConfigFileBuilder;

#[test]
fn full_config_is_parsed() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
projects_root = "/srv/projects"
python = "/opt/python3.12/bin/python3"
success_delay_ms = 250

[project]
readme = false
gitignore_extra = ["*.log", "data/"]
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.projects_root(Path::new("/ignored")), PathBuf::from("/srv/projects"));
    assert_eq!(cfg.python(), "/opt/python3.12/bin/python3");
    assert_eq!(cfg.success_delay(), Duration::from_millis(250));
    assert!(!cfg.project.readme);
    assert!(cfg.project.gitignore);
    assert_eq!(cfg.project.gitignore_extra, vec!["*.log", "data/"]);
}

#[test]
fn empty_file_means_defaults() {
    let file = NamedTempFile::new().unwrap();
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.projects_root(Path::new("/base")), PathBuf::from("/base/projects"));
    assert_eq!(cfg.success_delay(), Duration::from_millis(100));
    assert!(cfg.project.readme && cfg.project.gitignore);
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[config\nprojects_root = ").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(VenvmanError::TomlError(_))
    ));
}

#[test]
fn blank_gitignore_entry_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[project]
gitignore_extra = ["*.log", "  "]
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(VenvmanError::ConfigError(msg)) => assert!(msg.contains("gitignore_extra[1]")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn missing_file_falls_back_only_when_implicit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Venvman.toml");

    let cfg = load_or_default(&path, false).unwrap();
    assert_eq!(cfg.config.success_delay_ms, 100);

    assert!(matches!(
        load_or_default(&path, true),
        Err(VenvmanError::ConfigError(_))
    ));
}

#[test]
fn builder_produces_validated_config() {
    let cfg = ConfigFileBuilder::new()
        .projects_root("work")
        .python("python3.11")
        .success_delay_ms(0)
        .build();

    assert_eq!(cfg.projects_root(Path::new("/home/me")), PathBuf::from("/home/me/work"));
    assert_eq!(cfg.python(), "python3.11");
    assert!(cfg.success_delay().is_zero());
}
