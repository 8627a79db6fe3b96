// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, VenvmanError};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "Venvman.toml";

/// Parse `path` without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    parse(&fs::read_to_string(path.as_ref())?)
}

/// Parse and validate `path`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}

/// Like [`load_and_validate`], but a missing file means built-in defaults,
/// unless the user named it (`explicit`), which makes it an error.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<ConfigFile> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => ConfigFile::try_from(parse(&contents)?),
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(VenvmanError::ConfigError(format!(
            "config file {} does not exist",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

fn parse(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}
