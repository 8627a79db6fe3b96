// src/exec/sink.rs

//! What the runner emits: classified output lines and status changes.

use std::fmt;
use std::sync::Arc;

/// Classification of an emitted line, used by consumers to style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The command line being executed (`$ prog args`).
    Command,
    /// A line produced by the child process (stdout or stderr).
    Output,
    /// The command exited with status zero.
    Success,
    /// The command exited non-zero or could not be launched.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn command(text: impl Into<String>) -> Self {
        Self::new(LineKind::Command, text)
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LineKind::Output, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Coarse runner status, suitable for a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Ready,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Running => f.write_str("Running..."),
            RunStatus::Ready => f.write_str("Ready"),
        }
    }
}

/// Receives every line a command emits, in arrival order.
pub type LineSink = Arc<dyn Fn(OutputLine) + Send + Sync>;

/// Receives `Running` when a command starts and `Ready` when it is done.
pub type StatusSink = Arc<dyn Fn(RunStatus) + Send + Sync>;

/// Sink that drops everything.
pub fn discard_lines() -> LineSink {
    Arc::new(|_| {})
}

pub fn discard_status() -> StatusSink {
    Arc::new(|_| {})
}
