use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::mpsc;
use venvman::exec::{LineKind, LineSink, OutputLine, RunStatus, StatusSink};

/// Records everything a runner emits, with arrival times.
///
/// Every recorded line is also forwarded on an unbounded channel so tests
/// can observe lines while the command is still running.
#[derive(Clone)]
pub struct RecordingSinks {
    lines: Arc<Mutex<Vec<(Instant, OutputLine)>>>,
    statuses: Arc<Mutex<Vec<RunStatus>>>,
    line_tx: mpsc::UnboundedSender<OutputLine>,
}

impl RecordingSinks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutputLine>) {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let sinks = Self {
            lines: Arc::default(),
            statuses: Arc::default(),
            line_tx,
        };
        (sinks, line_rx)
    }

    pub fn line_sink(&self) -> LineSink {
        let lines = Arc::clone(&self.lines);
        let tx = self.line_tx.clone();
        Arc::new(move |line: OutputLine| {
            lines.lock().unwrap().push((Instant::now(), line.clone()));
            let _ = tx.send(line);
        })
    }

    pub fn status_sink(&self) -> StatusSink {
        let statuses = Arc::clone(&self.statuses);
        Arc::new(move |status| statuses.lock().unwrap().push(status))
    }

    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines.lock().unwrap().iter().map(|(_, l)| l.clone()).collect()
    }

    pub fn timed_lines(&self) -> Vec<(Instant, OutputLine)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn texts_of(&self, kind: LineKind) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text)
            .collect()
    }

    pub fn count_of(&self, kind: LineKind) -> usize {
        self.texts_of(kind).len()
    }

    pub fn statuses(&self) -> Vec<RunStatus> {
        self.statuses.lock().unwrap().clone()
    }
}
