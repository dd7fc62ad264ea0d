//! Error types for source archiving operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while building a source archive.
///
/// Every variant is fatal for the archiving call that produced it. Recoverable
/// anomalies (unsupported entries, lossy file names) are reported as warnings
/// on [`ArchiveResult`](crate::ArchiveResult) instead.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Configuration is inconsistent or incomplete.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Source directory, source file or extra file does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed part-way through the source tree.
    #[error("failed to walk {path}: {reason}")]
    Walk {
        /// Path at which the walker failed.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// The compression pipeline failed.
    #[error("archiver error: {0}")]
    Archiver(String),
}

impl ArchiveError {
    /// Returns `true` if this error was raised before any I/O because of
    /// invalid configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use srcpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidConfig {
    ///     reason: "missing include pattern".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// assert!(!err.is_filesystem_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Returns `true` if this error originates from the filesystem (missing
    /// source, permission denial, mid-walk fault).
    #[must_use]
    pub const fn is_filesystem_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::Io(_) | Self::Walk { .. }
        )
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Archiver(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        Self::Walk {
            path,
            reason: err.to_string(),
        }
    }
}
