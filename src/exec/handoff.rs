// src/exec/handoff.rs

//! Hand-off of on-success continuations back to the owning context.
//!
//! Worker tasks never call a continuation themselves. They queue it on a
//! [`MainSender`]; whoever owns the matching [`MainContext`] (the CLI's main
//! task, or a UI loop) runs it, either by polling with
//! [`MainContext::try_run_pending`] or by awaiting
//! [`MainContext::run_pending`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A zero-argument follow-up to run on the owning context.
pub type Continuation = Box<dyn FnOnce() + Send + 'static>;

/// Receiving end, owned by the context that may mutate caller state.
pub struct MainContext {
    rx: mpsc::UnboundedReceiver<Continuation>,
    pending: Arc<AtomicUsize>,
}

/// Sending end, cloned into every runner.
#[derive(Clone)]
pub struct MainSender {
    tx: mpsc::UnboundedSender<Continuation>,
    pending: Arc<AtomicUsize>,
}

impl MainContext {
    pub fn new() -> (MainContext, MainSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        (
            MainContext {
                rx,
                pending: Arc::clone(&pending),
            },
            MainSender { tx, pending },
        )
    }

    /// Continuations scheduled but not yet run (including ones still
    /// waiting out their delay).
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run every continuation that has already arrived, without waiting.
    /// Returns how many ran.
    pub fn try_run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(continuation) = self.rx.try_recv() {
            self.run_one(continuation);
            ran += 1;
        }
        ran
    }

    /// Wait for and run continuations until none are outstanding.
    /// Returns how many ran.
    pub async fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while self.pending() > 0 {
            match self.rx.recv().await {
                Some(continuation) => {
                    self.run_one(continuation);
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }

    fn run_one(&self, continuation: Continuation) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
        debug!("running continuation on main context");
        continuation();
    }
}

impl MainSender {
    /// Queue `continuation` for the main context once `delay` has elapsed.
    ///
    /// The pending count is bumped before this returns, so a caller that
    /// observes the run's outcome afterwards will also see the continuation
    /// as outstanding.
    pub fn schedule_after(&self, delay: Duration, continuation: Continuation) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if tx.send(continuation).is_err() {
                pending.fetch_sub(1, Ordering::SeqCst);
                warn!("main context dropped; continuation discarded");
            }
        });
    }
}
