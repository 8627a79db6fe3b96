// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `venvman`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "venvman",
    version,
    about = "Create and organize Python projects and their virtual environments.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Venvman.toml` in the current working directory; a missing
    /// default file means built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the projects (overrides `[config].projects_root`).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VENVMAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Manage projects.
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage virtual environments inside a project.
    #[command(subcommand)]
    Env(EnvCommand),

    /// Install a package into an environment (`pip install`).
    Install {
        project: String,
        env: String,
        package: String,
    },

    /// Install packages from a requirements file (`pip install -r`).
    InstallRequirements {
        project: String,
        env: String,
        file: PathBuf,
    },

    /// Write the environment's installed packages to a file (`pip freeze`).
    Freeze {
        project: String,
        env: String,
        /// Destination file, e.g. `requirements.txt`.
        dest: PathBuf,
    },

    /// List installed packages (`pip list`).
    Packages { project: String, env: String },

    /// Print every project with its environments and folders.
    Tree,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    /// Create a project with a README.md and .gitignore.
    New { name: String },
    /// Delete a project and all of its environments.
    Delete { name: String },
    /// Same as `venvman tree`.
    List,
    /// Print the project's directory.
    Path { name: String },
    /// Open the project folder in the file browser.
    Open { name: String },
    /// Open a terminal in the project folder.
    Terminal { name: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum EnvCommand {
    /// Create an environment with `python -m venv`.
    New { project: String, env: String },
    /// Delete an environment.
    Delete { project: String, env: String },
    /// Print the environment's directory.
    Path { project: String, env: String },
    /// Open a terminal with the environment activated.
    Terminal { project: String, env: String },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommands() {
        let args = CliArgs::try_parse_from(["venvman", "--root", "/tmp/p", "env", "new", "demo", "dev"])
            .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/tmp/p")));
        assert!(matches!(
            args.command,
            Commands::Env(EnvCommand::New { ref project, ref env }) if project == "demo" && env == "dev"
        ));
    }

    #[test]
    fn install_requirements_is_kebab_case() {
        let args = CliArgs::try_parse_from([
            "venvman",
            "install-requirements",
            "demo",
            "dev",
            "requirements.txt",
        ])
        .unwrap();
        assert!(matches!(args.command, Commands::InstallRequirements { .. }));
    }
}
