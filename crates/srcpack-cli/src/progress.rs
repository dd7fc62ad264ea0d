//! Progress spinner for archive creation.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use srcpack_core::ArchiveProgress;
use std::path::Path;
use std::time::Duration;

/// CLI spinner implementing `ArchiveProgress`.
///
/// The number of files to archive is unknown until the walk ends, so the
/// spinner shows running totals instead of a bar. It is drawn on stderr and
/// cleared on drop.
pub struct CliProgress {
    bar: ProgressBar,
    label: String,
    bytes_written: u64,
    directories_pruned: usize,
}

impl CliProgress {
    /// Creates and starts a spinner labelled `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ Archiving 42 files (15.2 MB, 3 folders pruned) src/main.rs"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix} {pos} files {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let progress = Self {
            bar,
            label: String::new(),
            bytes_written: 0,
            directories_pruned: 0,
        };
        progress.refresh();
        progress
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn refresh(&self) {
        let pruned = if self.directories_pruned > 0 {
            format!(", {} folders pruned", self.directories_pruned)
        } else {
            String::new()
        };
        self.bar.set_message(format!(
            "({}{pruned}) {}",
            humanize_bytes(self.bytes_written),
            self.label
        ));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ArchiveProgress for CliProgress {
    fn on_entry_added(&mut self, name: &str, _bytes: u64) {
        self.bar.inc(1);
        name.clone_into(&mut self.label);
        self.refresh();
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
    }

    fn on_directory_pruned(&mut self, _path: &Path) {
        self.directories_pruned += 1;
        self.refresh();
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
