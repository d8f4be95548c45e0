//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Provide a lightweight cancellation token that can be cloned and passed
//!   through command handlers.
//! - Define a single, recognizable `Cancelled` error used to signal user-initiated
//!   cancellation (Ctrl+C/SIGINT) through `anyhow::Result`.
//! - Centralize the cancellation message and the SIGINT exit code (130).
//!
//! Does NOT handle:
//! - Installing signal handlers (done in `main()`).
//!
//! Invariants:
//! - Once cancelled, a token remains cancelled forever.
//! - Runners are sequential, so cancellation takes effect between requests.

use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// Cancellation token usable across async tasks.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Cancel token (idempotent).
    pub fn cancel(&self) {
        let was_cancelled = self.cancelled.swap(true, Ordering::SeqCst);
        if !was_cancelled {
            self.notify.notify_waiters();
        }
    }

    /// True if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Await cancellation.
    ///
    /// The `notified()` future is created before the flag is checked so a
    /// concurrent `cancel()` cannot be missed.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Marker error used to indicate user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Returns true if this anyhow error represents a cancellation.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

/// Print standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

/// Race a fallible future against the token.
///
/// Evaluates to `anyhow::Result<T>`; the future's error is converted with
/// `anyhow::Error::from` so a `ClientError` stays downcastable for exit codes.
macro_rules! cancellable {
    ($fut:expr, $cancel:expr) => {
        tokio::select! {
            biased;
            _ = $cancel.cancelled() => {
                Err(anyhow::Error::new($crate::cancellation::Cancelled))
            }
            res = $fut => res.map_err(anyhow::Error::from),
        }
    };
}
