// src/exec/mod.rs

//! Process execution layer.
//!
//! Commands (`python -m venv`, `pip ...`) are run with
//! `tokio::process::Command`, one Tokio task per invocation, and observed
//! through caller-supplied sinks.
//!
//! - [`runner`] owns [`CommandRunner`], which streams merged stdout/stderr
//!   to a [`LineSink`] and reports [`RunStatus`] changes.
//! - [`sink`] defines the classified [`OutputLine`]s and the sink types.
//! - [`handoff`] delivers on-success continuations back to the owning
//!   [`MainContext`] instead of running them on the worker task.

pub mod handoff;
pub mod runner;
pub mod sink;

pub use handoff::{Continuation, MainContext, MainSender};
pub use runner::{CommandRunner, ExecutionOutcome, Invocation, RunHandle, DEFAULT_SUCCESS_DELAY};
pub use sink::{LineKind, LineSink, OutputLine, RunStatus, StatusSink};
