#![allow(dead_code)]

use std::path::PathBuf;

use venvman::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn projects_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.config.projects_root = root.into();
        self
    }

    pub fn python(mut self, python: &str) -> Self {
        self.config.config.python = Some(python.to_string());
        self
    }

    pub fn success_delay_ms(mut self, ms: u64) -> Self {
        self.config.config.success_delay_ms = ms;
        self
    }

    pub fn readme(mut self, enabled: bool) -> Self {
        self.config.project.readme = enabled;
        self
    }

    pub fn gitignore_extra(mut self, line: &str) -> Self {
        self.config.project.gitignore_extra.push(line.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
