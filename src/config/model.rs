// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::platform::Platform;

/// Configuration exactly as deserialized from `Venvman.toml`.
///
/// ```toml
/// [config]
/// projects_root = "projects"
/// python = "python3"
/// success_delay_ms = 100
///
/// [project]
/// readme = true
/// gitignore = true
/// gitignore_extra = ["*.log"]
/// ```
///
/// All sections are optional. Use `ConfigFile::try_from` to validate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub project: ProjectSection,
}

/// Validated configuration used by the rest of the crate.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub project: ProjectSection,
}

impl ConfigFile {
    /// Only `validate.rs` should call this; everyone else goes through
    /// `TryFrom<RawConfigFile>`.
    pub(crate) fn new_unchecked(config: ConfigSection, project: ProjectSection) -> Self {
        Self { config, project }
    }

    /// Projects root, resolved against `base_dir` when relative.
    pub fn projects_root(&self, base_dir: &Path) -> PathBuf {
        if self.config.projects_root.is_absolute() {
            self.config.projects_root.clone()
        } else {
            base_dir.join(&self.config.projects_root)
        }
    }

    /// Interpreter used for `-m venv`, falling back to the platform default.
    pub fn python(&self) -> String {
        self.config
            .python
            .clone()
            .unwrap_or_else(|| Platform::current().default_python().to_string())
    }

    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.config.success_delay_ms)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ConfigSection::default(), ProjectSection::default())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Directory holding one subdirectory per project. Relative paths are
    /// resolved against the directory of the config file.
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Interpreter for creating environments. `None` means `python3`
    /// (`python` on Windows).
    #[serde(default)]
    pub python: Option<String>,

    /// Delay before an on-success follow-up is handed back to the main
    /// context.
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}

fn default_success_delay_ms() -> u64 {
    100
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            python: None,
            success_delay_ms: default_success_delay_ms(),
        }
    }
}

/// `[project]` section: what gets generated for a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    #[serde(default = "default_true")]
    pub readme: bool,

    #[serde(default = "default_true")]
    pub gitignore: bool,

    /// Extra lines appended to the generated `.gitignore`.
    #[serde(default)]
    pub gitignore_extra: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            readme: true,
            gitignore: true,
            gitignore_extra: Vec::new(),
        }
    }
}
