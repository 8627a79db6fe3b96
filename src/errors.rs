// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every variant's `Display` is the human-readable message shown to the user;
//! callers report it as-is and move on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VenvmanError {
    #[error("The {kind} name must not be blank")]
    BlankName { kind: &'static str },

    #[error("Invalid {kind} name '{name}': only letters, digits, '-' and '_' are allowed")]
    InvalidName { kind: &'static str, name: String },

    #[error("A {kind} named '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("The {kind} '{name}' does not exist")]
    NotFound { kind: &'static str, name: String },

    #[error("The environment '{0}' does not exist or is not valid")]
    InvalidEnvironment(String),

    #[error("You must specify a package name")]
    BlankPackage,

    #[error("Command '{program}' failed (exit code {code})")]
    SubprocessExit { program: String, code: i32 },

    #[error("Could not launch '{program}': {source}")]
    SubprocessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VenvmanError>;

impl VenvmanError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        VenvmanError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn already_exists(kind: &'static str, name: impl Into<String>) -> Self {
        VenvmanError::AlreadyExists {
            kind,
            name: name.into(),
        }
    }
}
