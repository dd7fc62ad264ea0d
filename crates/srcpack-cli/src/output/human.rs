//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use srcpack_core::ArchiveListing;
use srcpack_core::ArchiveResult;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_archive_result(&self, output_path: &Path, result: &ArchiveResult) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            self.line(&format!("Archive created: {}", output_path.display()));
        }

        self.line("");
        self.line(&format!(
            "  Files archived:   {}",
            Self::format_number(result.file_count)
        ));
        self.line(&format!(
            "  Total size:       {}",
            humanize_bytes(result.bytes_written)
        ));
        self.line(&format!(
            "  Archive size:     {}",
            humanize_bytes(result.archive_size)
        ));

        if result.files_skipped > 0 {
            self.line(&format!(
                "  Files skipped:    {}",
                Self::format_number(result.files_skipped)
            ));
        }
        if result.duplicates_discarded > 0 {
            self.line(&format!(
                "  Duplicates:       {}",
                Self::format_number(result.duplicates_discarded)
            ));
        }
        if result.directories_pruned > 0 {
            self.line(&format!(
                "  Folders pruned:   {}",
                Self::format_number(result.directories_pruned)
            ));
        }

        if self.verbose {
            self.line(&format!(
                "  Compression:      {:.1}:1",
                result.compression_ratio()
            ));
            self.line(&format!("  Duration:         {:?}", result.duration));
        }

        if result.has_warnings() {
            self.line("");
            let header = format!("Warnings: {}", result.warnings.len());
            if self.use_colors {
                self.line(&format!("{}", style(header).yellow().bold()));
            } else {
                self.line(&header);
            }
            if self.verbose {
                for warning in &result.warnings {
                    self.line(&format!("  - {warning}"));
                }
            }
        }

        Ok(())
    }

    fn format_listing_short(&self, listing: &ArchiveListing) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &listing.entries {
            self.line(&entry.name);
        }

        Ok(())
    }

    fn format_listing_long(&self, listing: &ArchiveListing, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &listing.entries {
            let size_str = if human_readable {
                humanize_bytes(entry.size)
            } else {
                entry.size.to_string()
            };
            let mode_str = entry
                .mode
                .map_or_else(|| "-".to_string(), |m| format!("{:o}", m & 0o7777));

            self.line(&format!("{mode_str:<6} {size_str:>10}  {}", entry.name));
        }

        self.line("");
        self.line(&format!(
            "Total: {} files, {}",
            Self::format_number(listing.len()),
            humanize_bytes(listing.total_size)
        ));

        Ok(())
    }
}
