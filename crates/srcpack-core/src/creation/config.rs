//! Configuration for source archiving operations.

use crate::ArchiveError;
use crate::Result;

/// Highest deflate level; the default, favouring archive size over speed.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Configuration for source archiving operations.
///
/// # Examples
///
/// ```
/// use srcpack_core::ArchiveConfig;
///
/// // Maximum compression, no deduplication, pruning enabled
/// let config = ArchiveConfig::default();
///
/// let custom = ArchiveConfig::default()
///     .with_deduplicate(true)
///     .with_compression_level(6);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Deflate level (1-9), or 0 to store entries uncompressed.
    ///
    /// Default: `9`.
    pub compression_level: u8,

    /// Keep only the shallowest occurrences of files sharing a name.
    ///
    /// Default: `false`.
    pub deduplicate: bool,

    /// Skip subdirectories that cannot contain an included file.
    ///
    /// Disabling this forces a full traversal; the archived set is the same
    /// either way.
    ///
    /// Default: `true`.
    pub prune_directories: bool,

    /// Record unix permission bits on archive entries.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: MAX_COMPRESSION_LEVEL,
            deduplicate: false,
            prune_directories: true,
            preserve_permissions: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level (0-9). Checked by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether duplicate file names are discarded by depth.
    #[must_use]
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Sets whether directories are pruned during traversal.
    #[must_use]
    pub fn with_prune_directories(mut self, prune: bool) -> Self {
        self.prune_directories = prune;
        self
    }

    /// Sets whether permissions are preserved.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidConfig`] if the compression level is
    /// above 9.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ArchiveError::InvalidConfig {
                reason: format!(
                    "compression level must be 0-{MAX_COMPRESSION_LEVEL}, got {}",
                    self.compression_level
                ),
            });
        }
        Ok(())
    }
}
