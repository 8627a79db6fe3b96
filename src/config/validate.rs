// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, VenvmanError};

/// Upper bound for `success_delay_ms`; anything larger is almost certainly
/// a unit mistake (seconds vs milliseconds).
pub const MAX_SUCCESS_DELAY_MS: u64 = 10_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = VenvmanError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.project))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_project_templates(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.projects_root.as_os_str().is_empty() {
        return Err(VenvmanError::ConfigError(
            "[config].projects_root must not be empty".to_string(),
        ));
    }

    if let Some(python) = &cfg.config.python {
        if python.trim().is_empty() {
            return Err(VenvmanError::ConfigError(
                "[config].python must not be blank".to_string(),
            ));
        }
    }

    if cfg.config.success_delay_ms > MAX_SUCCESS_DELAY_MS {
        return Err(VenvmanError::ConfigError(format!(
            "[config].success_delay_ms must be <= {} (got {})",
            MAX_SUCCESS_DELAY_MS, cfg.config.success_delay_ms
        )));
    }

    Ok(())
}

fn validate_project_templates(cfg: &RawConfigFile) -> Result<()> {
    if let Some(pos) = cfg
        .project
        .gitignore_extra
        .iter()
        .position(|line| line.trim().is_empty())
    {
        return Err(VenvmanError::ConfigError(format!(
            "[project].gitignore_extra[{pos}] must not be blank"
        )));
    }
    Ok(())
}
