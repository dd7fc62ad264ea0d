//! Progress callbacks for archive creation.

use std::path::Path;

/// Receives progress updates while an archive is being built.
///
/// All callbacks run on the traversal thread, between two entries, so an
/// implementation must return quickly.
///
/// # Examples
///
/// ```
/// use srcpack_core::ArchiveProgress;
/// use std::path::Path;
///
/// #[derive(Default)]
/// struct Counter {
///     entries: usize,
/// }
///
/// impl ArchiveProgress for Counter {
///     fn on_entry_added(&mut self, _name: &str, _bytes: u64) {
///         self.entries += 1;
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_directory_pruned(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ArchiveProgress: Send {
    /// Called after an entry has been fully written to the archive.
    ///
    /// `name` is the entry name inside the archive; `bytes` its uncompressed
    /// size.
    fn on_entry_added(&mut self, name: &str, bytes: u64);

    /// Called for each chunk of file data streamed into the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when a subdirectory is skipped without being visited.
    fn on_directory_pruned(&mut self, path: &Path);

    /// Called once the archive has been finalized and closed.
    fn on_complete(&mut self);
}

/// No-op implementation of `ArchiveProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ArchiveProgress for NoopProgress {
    fn on_entry_added(&mut self, _name: &str, _bytes: u64) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_directory_pruned(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
