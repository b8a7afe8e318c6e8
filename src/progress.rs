// src/progress.rs

//! Job-local progress reporting
//!
//! Each conversion carries its own reporter value instead of mutating
//! process-wide counters, so concurrent jobs stay independently runnable
//! and testable.
//!
//! Implementations:
//! - `CliProgress`: visual progress bar using indicatif
//! - `LogProgress`: logs stage transitions to tracing
//! - `SilentProgress`: no-op for tests and scripted usage

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Receives stage-by-stage progress for a single conversion
pub trait ProgressReporter {
    /// A pipeline stage has started
    fn step(&self, message: &str);

    /// The conversion finished successfully
    fn finish(&self, message: &str);

    /// The conversion failed
    fn fail(&self, message: &str);
}

/// No-op reporter for tests and scripted usage
#[derive(Debug, Default)]
pub struct SilentProgress {
    steps: AtomicU64,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stages reported so far
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for SilentProgress {
    fn step(&self, _message: &str) {
        self.steps.fetch_add(1, Ordering::Relaxed);
    }

    fn finish(&self, _message: &str) {}

    fn fail(&self, _message: &str) {}
}

/// Reporter that logs stage transitions via tracing
///
/// Useful for non-interactive environments or verbose mode, where a
/// progress bar would fight with the log output.
#[derive(Debug, Default)]
pub struct LogProgress;

impl LogProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for LogProgress {
    fn step(&self, message: &str) {
        info!("{}", message);
    }

    fn finish(&self, message: &str) {
        info!("{}", message);
    }

    fn fail(&self, message: &str) {
        info!("ERROR - {}", message);
    }
}

/// Visual progress bar for interactive use
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a bar spanning `total` pipeline stages
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:50.cyan/dim}] {percent}% - {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("== "),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn step(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.inc(1);
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn fail(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_progress_counts_steps() {
        let progress = SilentProgress::new();
        assert_eq!(progress.steps(), 0);

        progress.step("one");
        progress.step("two");
        assert_eq!(progress.steps(), 2);

        progress.finish("done");
        assert_eq!(progress.steps(), 2);
    }

    #[test]
    fn test_log_progress_does_not_panic() {
        let progress = LogProgress::new();
        progress.step("stage");
        progress.finish("done");
        progress.fail("broken");
    }

    #[test]
    fn test_cli_progress_lifecycle() {
        let progress = CliProgress::new(3);
        progress.step("one");
        progress.step("two");
        progress.step("three");
        progress.finish("done");
    }
}
