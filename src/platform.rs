// src/platform.rs

//! Operating-system differences: executable layout inside an environment,
//! the default interpreter, and launching the file browser or a terminal.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

/// Terminal emulators tried in order on Linux and other Unix systems.
pub const UNIX_TERMINALS: &[&str] = &["gnome-terminal", "konsole", "xterm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Directory inside a virtual environment holding its executables.
    pub fn scripts_dir(self) -> &'static str {
        if self.is_windows() { "Scripts" } else { "bin" }
    }

    pub fn python_executable(self) -> &'static str {
        if self.is_windows() { "python.exe" } else { "python" }
    }

    pub fn pip_executable(self) -> &'static str {
        if self.is_windows() { "pip.exe" } else { "pip" }
    }

    /// Interpreter used to create new environments when none is configured.
    pub fn default_python(self) -> &'static str {
        if self.is_windows() { "python" } else { "python3" }
    }
}

/// Open `path` in the system file browser.
pub fn open_folder(platform: Platform, path: &Path) -> Result<()> {
    let program = match platform {
        Platform::Windows => "explorer",
        Platform::MacOs => "open",
        Platform::Unix => "xdg-open",
    };
    info!(program, path = %path.display(), "opening folder");

    Command::new(program)
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launching {program} for {:?}", path))?;
    Ok(())
}

/// Open a terminal whose working directory is `dir`.
pub fn open_terminal(platform: Platform, dir: &Path) -> Result<()> {
    match platform {
        Platform::Windows => {
            let cd = format!("cd /d \"{}\"", dir.display());
            Command::new("cmd")
                .args(["/c", "start", "cmd", "/k", &cd])
                .spawn()
                .context("launching cmd")?;
            Ok(())
        }
        Platform::MacOs => {
            Command::new("open")
                .args(["-a", "Terminal"])
                .arg(dir)
                .spawn()
                .context("launching Terminal.app")?;
            Ok(())
        }
        Platform::Unix => spawn_first_terminal(|terminal| {
            let mut cmd = Command::new(terminal);
            cmd.current_dir(dir);
            if terminal != "xterm" {
                cmd.arg("--working-directory").arg(dir);
            }
            cmd
        }),
    }
}

/// Open a terminal that runs `script` (an activation script written into an
/// environment).
pub fn open_script(platform: Platform, script: &Path) -> Result<()> {
    match platform {
        Platform::Windows => {
            Command::new("cmd")
                .args(["/c", "start", "cmd", "/k"])
                .arg(script)
                .spawn()
                .context("launching cmd")?;
            Ok(())
        }
        Platform::MacOs => {
            Command::new("open")
                .args(["-a", "Terminal"])
                .arg(script)
                .spawn()
                .context("launching Terminal.app")?;
            Ok(())
        }
        Platform::Unix => spawn_first_terminal(|terminal| {
            let mut cmd = Command::new(terminal);
            // xterm has no `--` separator.
            let separator = if terminal == "xterm" { "-e" } else { "--" };
            cmd.arg(separator).arg("bash").arg(script);
            cmd
        }),
    }
}

/// Try each known terminal emulator until one launches.
fn spawn_first_terminal(build: impl Fn(&str) -> Command) -> Result<()> {
    for terminal in UNIX_TERMINALS {
        match build(terminal).spawn() {
            Ok(_) => {
                info!(terminal, "terminal launched");
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(terminal, "terminal not installed; trying next");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("launching {terminal}"));
            }
        }
    }
    Err(anyhow!(
        "no terminal emulator found (tried {})",
        UNIX_TERMINALS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_layout_per_platform() {
        assert_eq!(Platform::Windows.scripts_dir(), "Scripts");
        assert_eq!(Platform::Windows.pip_executable(), "pip.exe");
        assert_eq!(Platform::Unix.scripts_dir(), "bin");
        assert_eq!(Platform::MacOs.python_executable(), "python");
    }

    #[test]
    fn default_python_differs_on_windows() {
        assert_eq!(Platform::Windows.default_python(), "python");
        assert_eq!(Platform::Unix.default_python(), "python3");
    }
}
