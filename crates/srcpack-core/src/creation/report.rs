//! Archiving operation results.

use std::time::Duration;

/// Result of a successful archiving call.
///
/// `file_count == 0` is a valid outcome; whether an empty archive is an error
/// is up to the caller.
///
/// # Examples
///
/// ```
/// use srcpack_core::ArchiveResult;
///
/// let mut result = ArchiveResult::default();
/// result.bytes_written = 1000;
/// result.archive_size = 250;
///
/// assert!(result.is_empty());
/// assert_eq!(result.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveResult {
    /// Number of entries written to the archive, including an inlined extra
    /// file.
    pub file_count: usize,

    /// Uncompressed bytes streamed into the archive.
    pub bytes_written: u64,

    /// Size of the finished archive on disk.
    pub archive_size: u64,

    /// Files visited but rejected by the filter policy.
    pub files_skipped: usize,

    /// Files discarded in favour of a shallower file with the same name.
    pub duplicates_discarded: usize,

    /// Subdirectories skipped without being visited.
    pub directories_pruned: usize,

    /// Non-fatal anomalies met while archiving.
    pub warnings: Vec<String>,

    /// Wall-clock duration of the call.
    pub duration: Duration,
}

impl ArchiveResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no entry was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    /// Records a warning message.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 when either size is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.archive_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_empty() {
        let result = ArchiveResult::new();
        assert!(result.is_empty());
        assert!(!result.has_warnings());
        assert_eq!(result.compression_ratio(), 0.0);
    }

    #[test]
    fn test_warnings() {
        let mut result = ArchiveResult::new();
        result.add_warning("Skipped socket: run/app.sock");
        assert!(result.has_warnings());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_ratio() {
        let mut result = ArchiveResult::new();
        result.bytes_written = 3000;
        result.archive_size = 1000;
        assert_eq!(result.compression_ratio(), 3.0);

        result.archive_size = 0;
        assert_eq!(result.compression_ratio(), 0.0);
    }
}
