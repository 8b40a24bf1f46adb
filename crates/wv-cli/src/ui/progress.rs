//! Progress indicators for long-running CLI operations.
//!
//! Provides spinners and progress bars using `indicatif`. Progress indicators
//! respect color settings and are disabled when stdout is not a TTY, when
//! `--quiet` mode is enabled, or when output is machine-readable (`--json`).

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::color::ColorMode;

/// Progress feedback mode based on output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Interactive TTY: show animated spinners and progress bars
    Interactive,
    /// Non-TTY or quiet: suppress progress, show only final results
    Quiet,
    /// Machine-readable: no progress at all (for --json)
    Silent,
}

impl ProgressMode {
    /// Detect the appropriate mode from environment and flags.
    pub fn detect(quiet: bool, json: bool, color_mode: ColorMode) -> Self {
        if json {
            Self::Silent
        } else if quiet || !atty::is(atty::Stream::Stdout) {
            Self::Quiet
        } else if color_mode.is_enabled() || atty::is(atty::Stream::Stdout) {
            Self::Interactive
        } else {
            Self::Quiet
        }
    }

    /// Check if progress should be shown.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Spinner tick characters (Braille-based).
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Progress bar characters.
const BAR_CHARS: &str = "█░";

/// A progress indicator that wraps indicatif.
///
/// Supports both spinner (indeterminate) and progress bar (determinate) modes.
pub struct Progress {
    bar: ProgressBar,
    mode: ProgressMode,
}

impl Progress {
    /// Create a spinner for indeterminate operations.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let progress = Progress::spinner("Reclaiming space...", mode);
    /// // ... do work ...
    /// progress.finish_with_message("[ok] Space reclaimed");
    /// ```
    pub fn spinner(message: &str, mode: ProgressMode) -> Self {
        let bar = if mode.is_interactive() {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars(SPINNER_CHARS)
                    .template("{spinner:.cyan} {msg} ({elapsed})")
                    .expect("valid template"),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        } else {
            // Hidden progress bar for quiet/silent mode
            ProgressBar::hidden()
        };

        Self { bar, mode }
    }

    /// Create a progress bar for determinate operations.
    pub fn bar(total: u64, message: &str, mode: ProgressMode) -> Self {
        let bar = if mode.is_interactive() {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:20.cyan/dim}] {percent:>3}% ({pos}/{len}) {msg} ({elapsed})")
                    .expect("valid template")
                    .progress_chars(BAR_CHARS),
            );
            pb.set_message(message.to_string());
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { bar, mode }
    }

    /// Update the message while running.
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Set the current position (for bars).
    pub fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    /// Finish and clear the progress line.
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }

    /// Finish with a message (replaces progress line).
    pub fn finish_with_message(&self, message: &str) {
        if self.mode.is_interactive() {
            self.bar.finish_and_clear();
        }
        if !message.is_empty() {
            println!("{}", message);
        }
    }
}
