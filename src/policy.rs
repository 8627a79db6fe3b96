// src/policy.rs

//! Name validation and on-disk layout of projects and environments.
//!
//! Everything here is pure except [`environment_exists`], which only looks at
//! the filesystem.

use std::path::{Path, PathBuf};

use crate::errors::{Result, VenvmanError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::platform::Platform;

/// Directory inside a project that holds its environments.
pub const VENVS_DIR: &str = "venvs";

/// Marker file that every virtual environment created by `venv` contains.
pub const VENV_MARKER: &str = "pyvenv.cfg";

/// True iff `name` is non-blank and, once `-` and `_` are removed, consists
/// only of alphanumeric characters.
pub fn validate_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .all(char::is_alphanumeric)
}

/// Layered check used by the managers: blank names are reported separately
/// from names with disallowed characters.
pub fn check_name(kind: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VenvmanError::BlankName { kind });
    }
    if !validate_name(name) {
        return Err(VenvmanError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

pub fn project_path(projects_root: &Path, project: &str) -> PathBuf {
    projects_root.join(project)
}

/// `projects_root/project/venvs/env`.
pub fn environment_path(projects_root: &Path, project: &str, env: &str) -> PathBuf {
    projects_root.join(project).join(VENVS_DIR).join(env)
}

/// True iff `path` is a directory holding a `pyvenv.cfg` marker.
pub fn environment_exists(path: &Path) -> bool {
    environment_exists_in(&RealFileSystem, path)
}

pub fn environment_exists_in(fs: &dyn FileSystem, path: &Path) -> bool {
    fs.is_dir(path) && fs.is_file(&path.join(VENV_MARKER))
}

pub fn interpreter_path(env_path: &Path, platform: Platform) -> PathBuf {
    env_path
        .join(platform.scripts_dir())
        .join(platform.python_executable())
}

pub fn installer_path(env_path: &Path, platform: Platform) -> PathBuf {
    env_path
        .join(platform.scripts_dir())
        .join(platform.pip_executable())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_dash_underscore() {
        assert!(validate_name("demo"));
        assert!(validate_name("my-project_2"));
        assert!(validate_name("Ñandú"));
        assert!(validate_name("--"));
    }

    #[test]
    fn rejects_other_characters() {
        assert!(!validate_name("my project"));
        assert!(!validate_name("a/b"));
        assert!(!validate_name("dot.name"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
    }

    #[test]
    fn check_name_reports_blank_before_invalid() {
        assert!(matches!(
            check_name("project", "  "),
            Err(VenvmanError::BlankName { kind: "project" })
        ));
        assert!(matches!(
            check_name("environment", "a b"),
            Err(VenvmanError::InvalidName { .. })
        ));
        assert!(check_name("project", "ok").is_ok());
    }

    #[test]
    fn executable_paths_follow_platform_layout() {
        let env = Path::new("/p/demo/venvs/dev");
        assert_eq!(
            interpreter_path(env, Platform::Unix),
            PathBuf::from("/p/demo/venvs/dev/bin/python")
        );
        assert_eq!(
            installer_path(env, Platform::MacOs),
            PathBuf::from("/p/demo/venvs/dev/bin/pip")
        );
        assert_eq!(
            installer_path(env, Platform::Windows),
            env.join("Scripts").join("pip.exe")
        );
        assert_eq!(
            interpreter_path(env, Platform::Windows),
            env.join("Scripts").join("python.exe")
        );
    }
}
