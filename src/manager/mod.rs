// src/manager/mod.rs

//! Project and environment operations.
//!
//! Every operation validates its input first and fails with a
//! [`VenvmanError`](crate::errors::VenvmanError) whose message can be shown
//! to the user as-is. Nothing is transactional: a failure half-way (for
//! example while writing the README) leaves whatever was already created.

pub mod environments;
pub mod projects;

pub use environments::{EnvironmentManager, Submitted};
pub use projects::{EnvironmentInfo, FolderInfo, ProjectInfo, ProjectManager};
