//! Terminal progress and status output.
//!
//! Everything here writes to stderr so stdout stays usable for piping the
//! output of `cite`.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::batch::BatchSummary;

/// Check if stderr is a terminal.
pub fn is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a styled status line to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print the outcome of a batch run.
pub fn print_summary(summary: &BatchSummary) {
    let msg = format!(
        "{} of {} titles resolved",
        summary.resolved.to_string().bold(),
        summary.total
    );
    if summary.failed == 0 {
        print_status(Status::Success, &msg);
    } else {
        print_status(
            Status::Warning,
            &format!("{} ({} not found or failed)", msg, summary.failed.to_string().yellow()),
        );
    }
}

/// Truncate a string to `max` characters, appending an ellipsis.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Progress bar over a list of titles
pub struct TitleProgress {
    pb: indicatif::ProgressBar,
}

impl TitleProgress {
    /// Create a progress bar for `total` titles; hidden when `visible` is false
    pub fn new(total: usize, visible: bool) -> Self {
        let pb = if visible {
            indicatif::ProgressBar::new(total as u64)
        } else {
            indicatif::ProgressBar::hidden()
        };
        pb.set_style(
            indicatif::ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .progress_chars("█▉ "),
        );
        pb.enable_steady_tick(Duration::from_millis(120));

        Self { pb }
    }

    /// Record that `done` titles are finished, the last being `title`
    pub fn advance(&self, done: usize, title: &str) {
        self.pb.set_position(done as u64);
        self.pb.set_message(truncate_with_ellipsis(title, 50));
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
