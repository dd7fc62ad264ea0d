//! ZIP output for source archives.
//!
//! Entries are streamed into a temporary file created next to the target and
//! the temporary file replaces the target only once the central directory has
//! been written and synced. Dropping an unfinished writer removes the
//! temporary file and leaves any previous archive at the target untouched.

use crate::ArchiveError;
use crate::ArchiveProgress;
use crate::Result;
use crate::creation::config::ArchiveConfig;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::Builder;
use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Size of the buffer used to stream file contents into the archive.
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Entries at or above this size need ZIP64 extensions.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Summary of a finalized archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedArchive {
    /// Number of entries written.
    pub entries: usize,
    /// Uncompressed bytes streamed into the archive.
    pub bytes_written: u64,
    /// Size of the archive file on disk.
    pub archive_size: u64,
}

/// Single-use writer for one archive file.
///
/// # Examples
///
/// ```no_run
/// use srcpack_core::ArchiveConfig;
/// use srcpack_core::NoopProgress;
/// use srcpack_core::creation::writer::ArchiveWriter;
/// use std::path::Path;
///
/// let mut writer = ArchiveWriter::create(Path::new("out.zip"), &ArchiveConfig::default())?;
/// writer.add_file(Path::new("Cargo.toml"), "Cargo.toml", &mut NoopProgress)?;
/// let finished = writer.finish()?;
/// assert_eq!(finished.entries, 1);
/// # Ok::<(), srcpack_core::ArchiveError>(())
/// ```
pub struct ArchiveWriter {
    zip: ZipWriter<BufWriter<NamedTempFile>>,
    target: PathBuf,
    temp_path: PathBuf,
    target_permissions: Option<fs::Permissions>,
    options: SimpleFileOptions,
    preserve_permissions: bool,
    buffer: Vec<u8>,
    entries: usize,
    bytes_written: u64,
}

impl ArchiveWriter {
    /// Opens a new archive that will be persisted at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the temporary file
    /// cannot be created in the target's directory.
    pub fn create(target: &Path, config: &ArchiveConfig) -> Result<Self> {
        config.validate()?;

        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = temp_file_in(parent)?;
        let temp_path = temp.path().to_path_buf();
        let target_permissions = fs::metadata(target).ok().map(|m| m.permissions());

        let options = if config.compression_level == 0 {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(config.compression_level)))
        };

        Ok(Self {
            zip: ZipWriter::new(BufWriter::new(temp)),
            target: target.to_path_buf(),
            temp_path,
            target_permissions,
            options,
            preserve_permissions: config.preserve_permissions,
            buffer: vec![0u8; COPY_BUFFER_SIZE],
            entries: 0,
            bytes_written: 0,
        })
    }

    /// Streams the file at `path` into the archive as `entry_name`.
    ///
    /// Returns the number of uncompressed bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the archive cannot be
    /// written.
    pub fn add_file(
        &mut self,
        path: &Path,
        entry_name: &str,
        progress: &mut dyn ArchiveProgress,
    ) -> Result<u64> {
        let mut file = File::open(path)?;
        let metadata = file.metadata()?;

        let mut options = self.options.large_file(metadata.len() >= ZIP64_THRESHOLD);
        if self.preserve_permissions {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                options = options.unix_permissions(metadata.permissions().mode());
            }
        }

        self.zip.start_file(entry_name, options)?;

        let mut written = 0u64;
        loop {
            let bytes_read = file.read(&mut self.buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.zip.write_all(&self.buffer[..bytes_read])?;
            written += bytes_read as u64;
            progress.on_bytes_written(bytes_read as u64);
        }

        self.entries += 1;
        self.bytes_written += written;
        progress.on_entry_added(entry_name, written);

        Ok(written)
    }

    /// Path of the temporary file receiving the archive until it is
    /// finished.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Path the archive is persisted to.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Number of entries written so far.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Writes the central directory and moves the archive onto the target
    /// path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be completed, synced or
    /// renamed. The temporary file is removed in that case.
    pub fn finish(self) -> Result<FinishedArchive> {
        let buffered = self.zip.finish()?;
        let temp = buffered
            .into_inner()
            .map_err(|e| ArchiveError::Io(e.into_error()))?;
        if let Some(permissions) = self.target_permissions {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.as_file().sync_all()?;

        let file = temp.persist(&self.target).map_err(|e| e.error)?;
        let archive_size = file.metadata()?.len();

        Ok(FinishedArchive {
            entries: self.entries,
            bytes_written: self.bytes_written,
            archive_size,
        })
    }
}

/// Creates the temporary archive file in `dir`.
///
/// On Unix the file is opened with mode `0o666` so that the umask, not the
/// owner-only default of temporary files, decides the archive's permissions.
fn temp_file_in(dir: &Path) -> Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".srcpack-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    Ok(builder.tempfile_in(dir)?)
}
