// src/manager/environments.rs

//! Virtual environments inside a project and the `pip` operations on them.
//!
//! Long-running commands (`venv`, `pip install`, `pip list`) go through the
//! [`CommandRunner`] and return a [`Submitted`] right away; their progress
//! and result arrive on the manager's sinks. `pip freeze` is the exception:
//! its output is captured and written to a file, so it is awaited here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, VenvmanError};
use crate::exec::{CommandRunner, Continuation, Invocation, LineSink, RunHandle, StatusSink};
use crate::fs::FileSystem;
use crate::platform::{self, Platform};
use crate::policy;
use crate::templates;

/// A command that was handed to the runner.
#[derive(Debug)]
pub struct Submitted {
    pub message: String,
    pub handle: RunHandle,
}

impl fmt::Display for Submitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct EnvironmentManager {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    platform: Platform,
    python: String,
    runner: CommandRunner,
    on_line: LineSink,
    on_status: StatusSink,
}

impl fmt::Debug for EnvironmentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentManager")
            .field("root", &self.root)
            .field("platform", &self.platform)
            .field("python", &self.python)
            .finish_non_exhaustive()
    }
}

impl EnvironmentManager {
    pub fn new(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        runner: CommandRunner,
        on_line: LineSink,
        on_status: StatusSink,
    ) -> Self {
        let platform = Platform::current();
        Self {
            root: root.into(),
            fs,
            platform,
            python: platform.default_python().to_string(),
            runner,
            on_line,
            on_status,
        }
    }

    /// Interpreter used to run `-m venv`.
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn path(&self, project: &str, env: &str) -> PathBuf {
        policy::environment_path(&self.root, project, env)
    }

    /// True iff both names are valid and the environment directory holds a
    /// `pyvenv.cfg`.
    pub fn exists(&self, project: &str, env: &str) -> bool {
        policy::validate_name(project)
            && policy::validate_name(env)
            && policy::environment_exists_in(self.fs.as_ref(), &self.path(project, env))
    }

    /// Run `<python> -m venv <path>`. `on_success` runs on the main context
    /// once the environment has been created.
    pub fn create(
        &self,
        project: &str,
        env: &str,
        on_success: Option<Continuation>,
    ) -> Result<Submitted> {
        let env_dir = self.checked_path(project, env)?;

        let project_dir = policy::project_path(&self.root, project);
        if !self.fs.exists(&project_dir) {
            return Err(VenvmanError::not_found("project", project));
        }

        if self.fs.exists(&env_dir) {
            return Err(VenvmanError::already_exists("environment", env));
        }

        info!(project, env, python = %self.python, "creating environment");
        let argv = vec![
            self.python.clone(),
            "-m".to_string(),
            "venv".to_string(),
            env_dir.display().to_string(),
        ];
        let mut invocation = self.invocation(argv);
        if let Some(continuation) = on_success {
            invocation = invocation.on_success(continuation);
        }

        Ok(self.submit(invocation, format!("Creating environment '{env}'...")))
    }

    pub fn delete(&self, project: &str, env: &str) -> Result<String> {
        let env_dir = self.checked_path(project, env)?;
        if !self.fs.exists(&env_dir) {
            return Err(VenvmanError::not_found("environment", env));
        }

        self.fs.remove_dir_all(&env_dir)?;
        info!(project, env, "environment deleted");
        Ok(format!("Environment '{env}' deleted"))
    }

    /// `pip install <package>`.
    pub fn install(&self, project: &str, env: &str, package: &str) -> Result<Submitted> {
        if package.trim().is_empty() {
            return Err(VenvmanError::BlankPackage);
        }
        let pip = self.installer(project, env)?;

        info!(project, env, package, "installing package");
        let argv = vec![
            pip.display().to_string(),
            "install".to_string(),
            package.to_string(),
        ];
        Ok(self.submit(self.invocation(argv), format!("Installing '{package}'...")))
    }

    /// `pip install -r <requirements>`.
    pub fn install_requirements(
        &self,
        project: &str,
        env: &str,
        requirements: &Path,
    ) -> Result<Submitted> {
        let pip = self.installer(project, env)?;
        if !self.fs.exists(requirements) {
            return Err(VenvmanError::not_found(
                "file",
                requirements.display().to_string(),
            ));
        }

        info!(project, env, requirements = %requirements.display(), "installing requirements");
        let argv = vec![
            pip.display().to_string(),
            "install".to_string(),
            "-r".to_string(),
            requirements.display().to_string(),
        ];
        Ok(self.submit(
            self.invocation(argv),
            format!("Installing from {}...", requirements.display()),
        ))
    }

    /// `pip list`.
    pub fn list_packages(&self, project: &str, env: &str) -> Result<Submitted> {
        let pip = self.installer(project, env)?;
        let argv = vec![pip.display().to_string(), "list".to_string()];
        Ok(self.submit(
            self.invocation(argv),
            format!("Listing packages of '{env}'..."),
        ))
    }

    /// Capture `pip freeze` and write it verbatim to `dest`.
    pub async fn freeze(&self, project: &str, env: &str, dest: &Path) -> Result<String> {
        let pip = self.installer(project, env)?;
        let program = pip.display().to_string();

        debug!(project, env, dest = %dest.display(), "running pip freeze");
        let output = Command::new(&pip)
            .arg("freeze")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| VenvmanError::SubprocessLaunch {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!(
                project,
                env,
                exit_code = code,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "pip freeze failed"
            );
            return Err(VenvmanError::SubprocessExit { program, code });
        }

        self.fs.write(dest, &output.stdout)?;
        info!(project, env, dest = %dest.display(), "requirements written");
        Ok(format!("Requirements saved to {}", dest.display()))
    }

    /// Write an activation script into the environment and open a terminal
    /// that runs it.
    pub fn open_terminal(&self, project: &str, env: &str) -> Result<String> {
        let env_dir = self.checked_path(project, env)?;
        let project_dir = policy::project_path(&self.root, project);
        if !self.fs.exists(&env_dir) {
            return Err(VenvmanError::not_found("environment", env));
        }

        let script = self.write_activation_script(project, env, &project_dir, &env_dir)?;
        platform::open_script(self.platform, &script).map_err(|e| {
            warn!(project, env, error = %e, "could not open terminal");
            VenvmanError::Other(e.context("could not open a terminal"))
        })?;
        Ok(format!("Terminal opened with environment '{env}'"))
    }

    pub fn write_activation_script(
        &self,
        project: &str,
        env: &str,
        project_dir: &Path,
        env_dir: &Path,
    ) -> Result<PathBuf> {
        let (file_name, body) =
            templates::activation_script(self.platform, project, env, project_dir, env_dir);
        let script = env_dir.join(file_name);
        self.fs.write(&script, body.as_bytes())?;
        self.fs.set_executable(&script)?;
        debug!(script = %script.display(), "activation script written");
        Ok(script)
    }

    /// Environment directory, once both names have passed the name policy.
    /// Names never reach a path unchecked, so `..` or an absolute name
    /// cannot point outside the projects root.
    fn checked_path(&self, project: &str, env: &str) -> Result<PathBuf> {
        policy::check_name("project", project)?;
        policy::check_name("environment", env)?;
        Ok(self.path(project, env))
    }

    /// Path of the environment's `pip`, which must exist.
    fn installer(&self, project: &str, env: &str) -> Result<PathBuf> {
        let pip = policy::installer_path(&self.checked_path(project, env)?, self.platform);
        if !self.fs.is_file(&pip) {
            return Err(VenvmanError::InvalidEnvironment(env.to_string()));
        }
        Ok(pip)
    }

    fn invocation(&self, argv: Vec<String>) -> Invocation {
        Invocation::new(argv, Arc::clone(&self.on_line), Arc::clone(&self.on_status))
    }

    fn submit(&self, invocation: Invocation, message: String) -> Submitted {
        let handle = self.runner.run(invocation);
        Submitted { message, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::MainContext;
    use crate::exec::sink::{discard_lines, discard_status};
    use crate::fs::mock::MockFileSystem;

    fn manager(fs: &MockFileSystem) -> EnvironmentManager {
        let (_main, sender) = MainContext::new();
        EnvironmentManager::new(
            "/root/projects",
            Arc::new(fs.clone()),
            CommandRunner::new(sender),
            discard_lines(),
            discard_status(),
        )
        .with_platform(Platform::Unix)
    }

    #[test]
    fn create_requires_existing_project() {
        let fs = MockFileSystem::new();
        let err = manager(&fs).create("ghost", "dev", None).unwrap_err();
        assert_eq!(err.to_string(), "The project 'ghost' does not exist");
    }

    #[test]
    fn create_rejects_existing_environment_and_bad_names() {
        let fs = MockFileSystem::new();
        fs.add_dir("/root/projects/demo/venvs/dev");
        let em = manager(&fs);

        assert!(matches!(
            em.create("demo", "dev", None),
            Err(VenvmanError::AlreadyExists { .. })
        ));
        assert!(matches!(
            em.create("demo", "", None),
            Err(VenvmanError::BlankName { .. })
        ));
        assert!(matches!(
            em.create("demo", "dev env", None),
            Err(VenvmanError::InvalidName { .. })
        ));
    }

    #[test]
    fn pip_operations_require_installer() {
        let fs = MockFileSystem::new();
        fs.add_file("/root/projects/demo/venvs/dev/pyvenv.cfg", "");
        let em = manager(&fs);

        assert!(em.exists("demo", "dev"));
        assert!(matches!(
            em.install("demo", "dev", "requests"),
            Err(VenvmanError::InvalidEnvironment(_))
        ));
        assert!(matches!(
            em.install("demo", "dev", "  "),
            Err(VenvmanError::BlankPackage)
        ));
    }

    #[test]
    fn install_requirements_checks_file() {
        let fs = MockFileSystem::new();
        fs.add_file("/root/projects/demo/venvs/dev/bin/pip", "");
        let err = manager(&fs)
            .install_requirements("demo", "dev", Path::new("/tmp/missing.txt"))
            .unwrap_err();
        assert_eq!(err.to_string(), "The file '/tmp/missing.txt' does not exist");
    }

    #[test]
    fn operations_reject_names_that_escape_the_root() {
        let fs = MockFileSystem::new();
        fs.add_file("/root/projects/demo/venvs/dev/bin/pip", "");
        fs.add_file("/root/projects/demo/venvs/dev/pyvenv.cfg", "");
        fs.add_file("/root/other/bin/pip", "");
        let em = manager(&fs);

        for env in ["../../other", "/root/other", ".."] {
            assert!(matches!(
                em.install("demo", env, "requests"),
                Err(VenvmanError::InvalidName { kind: "environment", .. })
            ));
            assert!(matches!(
                em.list_packages("demo", env),
                Err(VenvmanError::InvalidName { .. })
            ));
            assert!(matches!(
                em.open_terminal("demo", env),
                Err(VenvmanError::InvalidName { .. })
            ));
            assert!(matches!(
                em.create("demo", env, None),
                Err(VenvmanError::InvalidName { .. })
            ));
        }
        assert!(matches!(
            em.install_requirements("..", "dev", Path::new("/tmp/r.txt")),
            Err(VenvmanError::InvalidName { kind: "project", .. })
        ));
        assert!(fs.is_file(Path::new("/root/other/bin/pip")));
    }

    #[test]
    fn delete_missing_environment() {
        let fs = MockFileSystem::new();
        assert!(matches!(
            manager(&fs).delete("demo", "dev"),
            Err(VenvmanError::NotFound { kind: "environment", .. })
        ));
    }

    #[test]
    fn activation_script_is_written_into_environment() {
        let fs = MockFileSystem::new();
        fs.add_dir("/root/projects/demo/venvs/dev");
        let em = manager(&fs);

        let script = em
            .write_activation_script(
                "demo",
                "dev",
                Path::new("/root/projects/demo"),
                Path::new("/root/projects/demo/venvs/dev"),
            )
            .unwrap();
        assert_eq!(
            script,
            PathBuf::from("/root/projects/demo/venvs/dev/activate_terminal.sh")
        );
        assert!(fs.read_to_string(&script).unwrap().contains("bin/activate"));
    }
}
