//! Progress indicators for batch parsing.
//!
//! Bars are drawn only when stderr is an interactive terminal, so piped CI
//! logs stay clean.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Check if we should show progress indicators.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Create a determinate progress bar for a known number of files.
#[must_use]
pub fn create_progress_bar(total: u64, message: &str, show: bool) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if show {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("=>-"));
        pb.set_style(style);
        pb.set_message(message.to_string());
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// Progress bar wrapper that tracks whether we're showing output.
pub struct ProgressTracker {
    bar: ProgressBar,
    showing: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker; hidden when `quiet` or not on a terminal.
    #[must_use]
    pub fn new(total: u64, message: &str, quiet: bool) -> Self {
        let showing = !quiet && should_show_progress();
        Self {
            bar: create_progress_bar(total, message, showing),
            showing,
        }
    }

    /// Advance by `delta` files.
    pub fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    /// Update the message (usually the file being parsed).
    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Finish and clear the progress bar.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    /// Check if we're actually showing progress.
    #[must_use]
    pub const fn is_showing(&self) -> bool {
        self.showing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_hidden() {
        let pb = create_progress_bar(100, "Parsing", false);
        pb.inc(50);
        pb.finish();
    }

    #[test]
    fn test_quiet_tracker_never_shows() {
        let tracker = ProgressTracker::new(3, "Parsing UT", true);
        assert!(!tracker.is_showing());
        for name in ["a.xml", "b.xml", "c.xml"] {
            tracker.set_message(name);
            tracker.inc(1);
        }
        tracker.finish_and_clear();
    }
}
