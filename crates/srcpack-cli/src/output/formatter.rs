//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use srcpack_core::ArchiveListing;
use srcpack_core::ArchiveResult;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of an archive command
    fn format_archive_result(&self, output_path: &Path, result: &ArchiveResult) -> Result<()>;

    /// Format archive entry names
    fn format_listing_short(&self, listing: &ArchiveListing) -> Result<()>;

    /// Format archive entries with sizes and permissions
    fn format_listing_long(&self, listing: &ArchiveListing, human_readable: bool) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data,
        }
    }
}
