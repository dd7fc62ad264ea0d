//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use srcpack_core::ArchiveListing;
use srcpack_core::ArchiveResult;
use std::io;
use std::io::Write;
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ArchiveOutput {
    output_path: String,
    file_count: usize,
    bytes_written: u64,
    archive_size: u64,
    compression_ratio: f64,
    files_skipped: usize,
    duplicates_discarded: usize,
    directories_pruned: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    name: &'a str,
    size: u64,
    compressed_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
}

#[derive(Serialize)]
struct ListingOutput<'a> {
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryOutput<'a>>,
}

impl ListingOutput<'_> {
    fn new(listing: &ArchiveListing) -> ListingOutput<'_> {
        ListingOutput {
            total_entries: listing.len(),
            total_size: listing.total_size,
            entries: listing
                .entries
                .iter()
                .map(|entry| EntryOutput {
                    name: &entry.name,
                    size: entry.size,
                    compressed_size: entry.compressed_size,
                    mode: entry.mode,
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_archive_result(&self, output_path: &Path, result: &ArchiveResult) -> Result<()> {
        let data = ArchiveOutput {
            output_path: output_path.display().to_string(),
            file_count: result.file_count,
            bytes_written: result.bytes_written,
            archive_size: result.archive_size,
            compression_ratio: result.compression_ratio(),
            files_skipped: result.files_skipped,
            duplicates_discarded: result.duplicates_discarded,
            directories_pruned: result.directories_pruned,
            duration_ms: result.duration.as_millis(),
            warnings: result.warnings.clone(),
        };

        Self::output(&JsonOutput::success("archive", data))
    }

    fn format_listing_short(&self, listing: &ArchiveListing) -> Result<()> {
        Self::output(&JsonOutput::success("list", ListingOutput::new(listing)))
    }

    fn format_listing_long(&self, listing: &ArchiveListing, _human_readable: bool) -> Result<()> {
        self.format_listing_short(listing)
    }
}
