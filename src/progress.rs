//! Progress display for an upgrade run
//!
//! Provides visual feedback while modules are resolved and upgraded using
//! indicatif. Everything is written to stderr and disabled in quiet mode.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Progress reporter for the upgrade workflow
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet mode)
    enabled: bool,
    /// Current progress bar
    bar: Option<ProgressBar>,
}

/// Cloneable handle that lets concurrent tasks advance the current bar
#[derive(Clone, Default)]
pub struct ProgressHandle(Option<ProgressBar>);

impl ProgressHandle {
    /// A handle that does nothing
    pub fn none() -> Self {
        Self(None)
    }

    /// Increment progress by one
    pub fn inc(&self) {
        if let Some(ref bar) = self.0 {
            bar.inc(1);
        }
    }
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns true if output is shown
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Show a spinner with a message for an indeterminate operation
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_spinner()
            .tick_chars(SPINNER_TICKS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Start a progress bar for a known number of items
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
            .map(|style| style.progress_chars("█▓▒░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(total);
        bar.set_style(style.tick_chars(SPINNER_TICKS));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Handle for advancing the current bar from spawned tasks
    pub fn handle(&self) -> ProgressHandle {
        ProgressHandle(self.bar.clone())
    }

    /// Print a line to stderr without corrupting an active bar
    pub fn println(&self, line: &str) {
        if !self.enabled {
            return;
        }
        match self.bar {
            Some(ref bar) => bar.println(line),
            None => eprintln!("{}", line),
        }
    }

    /// Finish and clear the current progress bar
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.spinner("test");
        progress.start(10, "test");
        progress.handle().inc();
        progress.println("line");
        progress.finish_and_clear();
        assert!(!progress.is_enabled());
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Resolving modules");
        let handle = progress.handle();
        handle.inc();
        handle.clone().inc();
        progress.println("example.com/a");
        progress.finish_and_clear();
    }

    #[test]
    fn test_handle_outlives_bar() {
        let mut progress = Progress::new(true);
        progress.spinner("Reading go.mod");
        let handle = progress.handle();
        progress.finish_and_clear();
        handle.inc();
        ProgressHandle::none().inc();
    }
}
