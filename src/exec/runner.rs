// src/exec/runner.rs

//! Asynchronous command runner.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::errors::{Result, VenvmanError};

use super::handoff::{Continuation, MainSender};
use super::sink::{LineSink, OutputLine, RunStatus, StatusSink};

/// Default delay between a successful exit and the continuation being queued
/// on the main context.
pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(100);

/// Where a single invocation stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Running,
    Succeeded,
    /// The process exited non-zero (`-1` if it was killed by a signal).
    ExitFailure(i32),
    /// The process could not be started (or waited on).
    LaunchFailure(String),
}

impl ExecutionOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionOutcome::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded)
    }
}

/// One command to run, together with the sinks that observe it.
pub struct Invocation {
    argv: Vec<String>,
    working_dir: Option<PathBuf>,
    on_line: LineSink,
    on_status: StatusSink,
    on_success: Option<Continuation>,
}

impl Invocation {
    pub fn new<I, S>(argv: I, on_line: LineSink, on_status: StatusSink) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            working_dir: None,
            on_line,
            on_status,
            on_success: None,
        }
    }

    /// Run the process in `dir` instead of the caller's current directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Follow-up to run on the main context after a zero exit.
    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The command line as shown to the user.
    pub fn command_line(&self) -> String {
        format!("$ {}", self.argv.join(" "))
    }
}

/// Observes the outcome of a submitted invocation.
///
/// Dropping the handle does not affect the command.
#[derive(Debug, Clone)]
pub struct RunHandle {
    outcome: watch::Receiver<ExecutionOutcome>,
}

impl RunHandle {
    /// Current outcome without waiting.
    pub fn outcome(&self) -> ExecutionOutcome {
        self.outcome.borrow().clone()
    }

    /// Wait until the command has finished and its `Ready` status was sent.
    pub async fn wait(mut self) -> ExecutionOutcome {
        match self.outcome.wait_for(|o| !o.is_running()).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => ExecutionOutcome::LaunchFailure("runner task ended unexpectedly".to_string()),
        }
    }
}

/// Launches one external process per invocation on its own Tokio task.
///
/// Invocations are independent: there is no queueing, deduplication or
/// cancellation between them.
#[derive(Clone)]
pub struct CommandRunner {
    main: MainSender,
    success_delay: Duration,
}

impl CommandRunner {
    pub fn new(main: MainSender) -> Self {
        Self {
            main,
            success_delay: DEFAULT_SUCCESS_DELAY,
        }
    }

    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    /// Start `invocation` in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(&self, invocation: Invocation) -> RunHandle {
        let (outcome_tx, outcome_rx) = watch::channel(ExecutionOutcome::Running);
        let main = self.main.clone();
        let delay = self.success_delay;

        tokio::spawn(async move {
            let outcome = execute(invocation, &main, delay).await;
            outcome_tx.send_replace(outcome);
        });

        RunHandle {
            outcome: outcome_rx,
        }
    }
}

async fn execute(invocation: Invocation, main: &MainSender, delay: Duration) -> ExecutionOutcome {
    let command_line = invocation.command_line();
    let Invocation {
        argv,
        working_dir,
        on_line,
        on_status,
        on_success,
    } = invocation;

    on_status(RunStatus::Running);
    on_line(OutputLine::command(command_line));

    let outcome = match stream_process(&argv, working_dir.as_deref(), &on_line).await {
        Ok(status) if status.success() => {
            info!(program = %argv[0], "command completed");
            on_line(OutputLine::success("✓ Command completed successfully"));
            if let Some(continuation) = on_success {
                main.schedule_after(delay, continuation);
            }
            ExecutionOutcome::Succeeded
        }
        Ok(status) => {
            let code = status.code().unwrap_or(-1);
            info!(program = %argv[0], exit_code = code, "command failed");
            on_line(OutputLine::error(format!("✗ Command failed (exit code {code})")));
            ExecutionOutcome::ExitFailure(code)
        }
        Err(err) => {
            error!(argv = ?argv, error = %err, "command could not be run");
            let message = err.to_string();
            on_line(OutputLine::error(format!("✗ Error: {message}")));
            ExecutionOutcome::LaunchFailure(message)
        }
    };

    on_status(RunStatus::Ready);
    outcome
}

/// Spawn the process and forward its merged stdout/stderr line by line.
///
/// Both streams of the child share the write end of a single pipe, so lines
/// arrive in the order the process wrote them.
async fn stream_process(
    argv: &[String],
    working_dir: Option<&Path>,
    on_line: &LineSink,
) -> Result<ExitStatus> {
    let (program, args) = argv.split_first().ok_or_else(|| {
        launch_error(
            "",
            io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        )
    })?;

    info!(program = %program, ?args, cwd = ?working_dir, "starting command");

    let (reader, writer) = io::pipe().map_err(|e| launch_error(program, e))?;
    let stderr_writer = writer.try_clone().map_err(|e| launch_error(program, e))?;
    let output = output_pipe(reader).map_err(|e| launch_error(program, e))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let spawned = cmd.spawn();
    // `cmd` still owns our copies of the write end; EOF only arrives once
    // the child holds the last ones.
    drop(cmd);
    let mut child = spawned.map_err(|e| launch_error(program, e))?;

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    spawn_line_reader(output, line_tx);

    while let Some(line) = line_rx.recv().await {
        on_line(OutputLine::output(line));
    }

    let status = child.wait().await?;
    debug!(program = %program, ?status, "command exited");
    Ok(status)
}

fn launch_error(program: &str, source: io::Error) -> VenvmanError {
    VenvmanError::SubprocessLaunch {
        program: program.to_string(),
        source,
    }
}

fn decode_line(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

#[cfg(unix)]
type OutputPipe = tokio::net::unix::pipe::Receiver;

#[cfg(not(unix))]
type OutputPipe = io::PipeReader;

#[cfg(unix)]
fn output_pipe(reader: io::PipeReader) -> io::Result<OutputPipe> {
    OutputPipe::from_owned_fd(reader.into())
}

#[cfg(not(unix))]
fn output_pipe(reader: io::PipeReader) -> io::Result<OutputPipe> {
    Ok(reader)
}

#[cfg(unix)]
fn spawn_line_reader(pipe: OutputPipe, tx: mpsc::UnboundedSender<String>) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(decode_line(&buf)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "error reading command output");
                    break;
                }
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_line_reader(pipe: OutputPipe, tx: mpsc::UnboundedSender<String>) {
    use std::io::{BufRead, BufReader};

    tokio::task::spawn_blocking(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(decode_line(&buf)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "error reading command output");
                    break;
                }
            }
        }
    });
}
