// src/config/mod.rs

//! Configuration loading and validation for venvman.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like a non-blank interpreter (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path, load_or_default,
};
pub use model::{ConfigFile, ConfigSection, ProjectSection, RawConfigFile};
