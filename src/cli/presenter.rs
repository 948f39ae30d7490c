//! CLI presenter for output formatting

use colored::*;

use super::ipc::{DaemonStatus, EntrySummary};

/// Presenter for CLI output formatting.
///
/// Status messages go to stderr; data (entries, HTML, config values) goes
/// to stdout so it can be piped.
pub struct Presenter;

impl Presenter {
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print history rows, or a note when there are none
    pub fn entries(&self, entries: &[EntrySummary]) {
        if entries.is_empty() {
            self.info("History is empty");
            return;
        }
        for entry in entries {
            println!("{}", format_entry_row(entry));
        }
    }

    pub fn status(&self, status: &DaemonStatus) {
        let state = match (status.monitoring, status.paused) {
            (false, _) => "stopped".red(),
            (true, true) => "paused".yellow(),
            (true, false) => "monitoring".green(),
        };
        self.daemon_status(&format!(
            "{} | {}/{} entries",
            state, status.entries, status.capacity
        ));
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One listing line: short id, markers, capture time, preview
pub fn format_entry_row(entry: &EntrySummary) -> String {
    let favorite = if entry.is_favorite { "★" } else { " " };
    let rich = if entry.has_rich { "md" } else { "  " };
    format!(
        "{} {} {} {}  {}",
        entry.short_id.cyan(),
        favorite.yellow(),
        rich.magenta(),
        entry.captured.dimmed(),
        entry.preview.replace('\n', " ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(preview: &str, favorite: bool, rich: bool) -> EntrySummary {
        EntrySummary {
            id: "0f8e2c1a-0000-4000-8000-000000000000".to_string(),
            short_id: "0f8e2c1a".to_string(),
            preview: preview.to_string(),
            captured: "2026-01-02 03:04:05".to_string(),
            is_favorite: favorite,
            has_rich: rich,
        }
    }

    #[test]
    fn row_shows_id_time_and_preview() {
        colored::control::set_override(false);
        let row = format_entry_row(&summary("hello", false, false));
        assert!(row.starts_with("0f8e2c1a"));
        assert!(row.contains("2026-01-02 03:04:05"));
        assert!(row.ends_with("hello"));
    }

    #[test]
    fn row_marks_favorites_and_rich_entries() {
        colored::control::set_override(false);
        let row = format_entry_row(&summary("# Title", true, true));
        assert!(row.contains('★'));
        assert!(row.contains("md"));
    }

    #[test]
    fn row_stays_on_one_line() {
        colored::control::set_override(false);
        let row = format_entry_row(&summary("a\nb", false, false));
        assert!(!row.contains('\n'));
        assert!(row.ends_with("a b"));
    }
}
