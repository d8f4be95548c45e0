//! Progress indicator utilities.
//!
//! Responsibilities:
//! - Provide an indefinite spinner for network-bound runs.
//! - Ensure ALL progress output is written to STDERR (never stdout), so
//!   machine-readable command output is not contaminated.
//! - Allow global suppression via a caller-provided `enabled` boolean (driven by `--quiet`).
//!
//! Non-responsibilities:
//! - This module does not print command results; stdout remains reserved for results.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// An indefinite spinner for unknown-duration operations.
///
/// Always draws to STDERR; no-op when disabled.
pub(crate) struct Spinner {
    label: String,
    pb: Option<ProgressBar>,
}

impl Spinner {
    /// Create a new spinner.
    ///
    /// `enabled` should be `!quiet`.
    pub(crate) fn new(enabled: bool, label: impl Into<String>) -> Self {
        let label = label.into();

        if !enabled {
            return Self { label, pb: None };
        }

        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("template is a compile-time constant with valid syntax"),
        );
        pb.set_message(label.clone());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            label,
            pb: Some(pb),
        }
    }

    /// Finish the spinner, leaving `label: summary` on STDERR.
    pub(crate) fn finish(&self, summary: &str) {
        let Some(pb) = &self.pb else {
            return;
        };

        pb.finish_with_message(format!("{}: {summary}", self.label));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        // Clear an unfinished line so it does not interleave with error output.
        if let Some(pb) = &self.pb
            && !pb.is_finished()
        {
            pb.finish_and_clear();
        }
    }
}
