// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod manager;
pub mod platform;
pub mod policy;
pub mod templates;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::{CliArgs, Commands, EnvCommand, ProjectCommand};
use crate::config::{ConfigFile, default_config_path, load_or_default};
use crate::exec::{CommandRunner, Continuation, ExecutionOutcome, MainContext};
use crate::fs::{FileSystem, RealFileSystem};
use crate::manager::{EnvironmentManager, ProjectManager, Submitted};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the project and environment managers
/// - the command runner and the main context that receives its
///   on-success continuations
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.is_some();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path, explicit)?;

    let root = match &args.root {
        Some(root) => root.clone(),
        None => cfg.projects_root(&config_root_dir(&config_path)),
    };
    info!(root = %root.display(), python = %cfg.python(), "venvman starting");

    let mut app = App::new(&cfg, root);
    app.dispatch(args.command).await
}

/// Directory that relative paths in the config are resolved against.
///
/// - A config path with a non-empty parent (e.g. "conf/Venvman.toml") uses
///   that directory.
/// - A bare file name falls back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// The CLI's owning context: managers plus the continuation queue.
struct App {
    projects: ProjectManager,
    envs: EnvironmentManager,
    main: MainContext,
}

impl App {
    fn new(cfg: &ConfigFile, root: PathBuf) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let (main, sender) = MainContext::new();
        let runner = CommandRunner::new(sender).with_success_delay(cfg.success_delay());

        let projects = ProjectManager::from_config(cfg, root.clone(), Arc::clone(&fs));
        let envs = EnvironmentManager::new(
            root,
            fs,
            runner,
            console::line_sink(),
            console::status_sink(),
        )
        .with_python(cfg.python());

        Self {
            projects,
            envs,
            main,
        }
    }

    async fn dispatch(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Project(cmd) => self.project(cmd),
            Commands::Env(cmd) => self.env(cmd).await,
            Commands::Install {
                project,
                env,
                package,
            } => {
                let submitted = self.envs.install(&project, &env, &package)?;
                self.finish(submitted).await
            }
            Commands::InstallRequirements { project, env, file } => {
                let submitted = self.envs.install_requirements(&project, &env, &file)?;
                self.finish(submitted).await
            }
            Commands::Freeze { project, env, dest } => {
                println!("{}", self.envs.freeze(&project, &env, &dest).await?);
                Ok(())
            }
            Commands::Packages { project, env } => {
                let submitted = self.envs.list_packages(&project, &env)?;
                self.finish(submitted).await
            }
            Commands::Tree => {
                print!("{}", console::render_tree(&self.projects.list()));
                Ok(())
            }
        }
    }

    fn project(&self, cmd: ProjectCommand) -> Result<()> {
        let message = match cmd {
            ProjectCommand::New { name } => self.projects.create(&name)?,
            ProjectCommand::Delete { name } => self.projects.delete(&name)?,
            ProjectCommand::List => {
                print!("{}", console::render_tree(&self.projects.list()));
                return Ok(());
            }
            ProjectCommand::Path { name } => {
                if !self.projects.exists(&name) {
                    return Err(errors::VenvmanError::not_found("project", name).into());
                }
                self.projects.path(&name).display().to_string()
            }
            ProjectCommand::Open { name } => self.projects.open_folder(&name)?,
            ProjectCommand::Terminal { name } => self.projects.open_terminal(&name)?,
        };
        println!("{message}");
        Ok(())
    }

    async fn env(&mut self, cmd: EnvCommand) -> Result<()> {
        match cmd {
            EnvCommand::New { project, env } => {
                // Show the refreshed tree once the environment exists.
                let projects = self.projects.clone();
                let name = env.clone();
                let on_success: Continuation = Box::new(move || {
                    println!("Environment '{name}' ready");
                    print!("{}", console::render_tree(&projects.list()));
                });
                let submitted = self.envs.create(&project, &env, Some(on_success))?;
                self.finish(submitted).await
            }
            EnvCommand::Delete { project, env } => {
                println!("{}", self.envs.delete(&project, &env)?);
                Ok(())
            }
            EnvCommand::Path { project, env } => {
                if !self.envs.exists(&project, &env) {
                    return Err(errors::VenvmanError::not_found("environment", env).into());
                }
                println!("{}", self.envs.path(&project, &env).display());
                Ok(())
            }
            EnvCommand::Terminal { project, env } => {
                println!("{}", self.envs.open_terminal(&project, &env)?);
                Ok(())
            }
        }
    }

    /// Wait for a submitted command, then run any continuation it queued.
    async fn finish(&mut self, submitted: Submitted) -> Result<()> {
        println!("{}", submitted.message);
        let outcome = submitted.handle.wait().await;
        let ran = self.main.run_pending().await;
        debug!(?outcome, continuations = ran, "command finished");

        match outcome {
            ExecutionOutcome::Succeeded => Ok(()),
            ExecutionOutcome::ExitFailure(code) => bail!("command exited with code {code}"),
            ExecutionOutcome::LaunchFailure(message) => bail!("command could not be run: {message}"),
            ExecutionOutcome::Running => bail!("command still running"),
        }
    }
}
