//! Listing the contents of produced archives.

use crate::ArchiveError;
use crate::Result;
use std::fs::File;
use std::io;
use std::path::Path;

/// One entry of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name (forward-slash relative path).
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Unix permission bits, when recorded.
    pub mode: Option<u32>,
}

/// Entries of an archive, in archive order.
#[derive(Debug, Clone, Default)]
pub struct ArchiveListing {
    /// The entries.
    pub entries: Vec<ArchiveEntry>,
    /// Sum of the uncompressed entry sizes.
    pub total_size: u64,
}

impl ArchiveListing {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lists the entries of the ZIP archive at `path` without extracting it.
///
/// # Examples
///
/// ```no_run
/// use srcpack_core::list_archive;
/// use std::path::Path;
///
/// let listing = list_archive(Path::new("upload.zip"))?;
/// for entry in &listing.entries {
///     println!("{} ({} bytes)", entry.name, entry.size);
/// }
/// # Ok::<(), srcpack_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the file does not exist or is not a readable ZIP
/// archive.
pub fn list_archive(path: &Path) -> Result<ArchiveListing> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ArchiveError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArchiveError::Io(e)
        }
    })?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut listing = ArchiveListing::default();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        listing.total_size += entry.size();
        listing.entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
            mode: entry.unix_mode(),
        });
    }

    Ok(listing)
}
