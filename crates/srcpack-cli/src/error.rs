//! Error conversion utilities for CLI.
//!
//! Converts srcpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use srcpack_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to a user-friendly anyhow error with context.
pub fn convert_archive_error(err: ArchiveError, subject: &Path) -> anyhow::Error {
    match err {
        ArchiveError::InvalidConfig { reason } => {
            anyhow!(
                "Invalid configuration: {reason}\n\
                 HINT: Check the --include, --exclude and --manifests patterns."
            )
        }
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Path not found: '{}'\n\
                 HINT: Source, extra file and archive paths must exist.",
                path.display()
            )
        }
        ArchiveError::Walk { path, reason } => {
            anyhow!(
                "Failed to read '{}' while walking '{}': {reason}\n\
                 HINT: Check permissions, or exclude the folder with --exclude.",
                path.display(),
                subject.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {io_err}",
                subject.display()
            )
        }
        ArchiveError::Archiver(reason) => {
            anyhow!(
                "Archive error for '{}': {reason}\n\
                 HINT: No archive was written; the previous file, if any, is unchanged.",
                subject.display()
            )
        }
    }
}

/// Adds context to an archiving result.
pub fn add_archive_context<T>(
    result: srcpack_core::Result<T>,
    subject: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_config_error() {
        let err = ArchiveError::InvalidConfig {
            reason: "manifest-only archiving requires at least one manifest include pattern"
                .to_string(),
        };
        let msg = format!("{:?}", convert_archive_error(err, Path::new("src")));
        assert!(msg.contains("Invalid configuration"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_source_not_found() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("missing/project"),
        };
        let msg = format!("{:?}", convert_archive_error(err, Path::new("missing/project")));
        assert!(msg.contains("Path not found"));
        assert!(msg.contains("missing/project"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = ArchiveError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let msg = format!("{:?}", convert_archive_error(err, Path::new("src")));
        assert!(msg.contains("I/O error"));
    }
}
