//! Selective source archiving.
//!
//! `srcpack-core` walks a source tree, decides per file and per directory
//! subtree whether content belongs in an upload archive, optionally keeps only
//! the shallowest of several files sharing a name, and streams the surviving
//! files into a single ZIP archive.
//!
//! Subdirectories that cannot contain an included file are never entered, so
//! excluding `node_modules` costs nothing however large it is. Skipping them
//! never changes which files end up in the archive.
//!
//! # Examples
//!
//! ```no_run
//! use srcpack_core::ArchiveConfig;
//! use srcpack_core::FilterPolicy;
//! use srcpack_core::PatternFilter;
//! use srcpack_core::archive_source;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = FilterPolicy::single(PatternFilter::new("java,pom.xml", "target,node_modules"));
//! let result = archive_source(
//!     Path::new("project"),
//!     Path::new("upload.zip"),
//!     None,
//!     &policy,
//!     &ArchiveConfig::default(),
//! )?;
//! println!("Archived {} files", result.file_count);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod creation;
pub mod error;
pub mod filter;
pub mod inspection;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use creation::ArchiveConfig;
pub use creation::ArchiveProgress;
pub use creation::ArchiveResult;
pub use creation::ArchivingEngine;
pub use creation::NoopProgress;
pub use creation::archive_source;
pub use error::ArchiveError;
pub use error::Result;
pub use filter::FilterPolicy;
pub use filter::PatternFilter;
pub use inspection::ArchiveEntry;
pub use inspection::ArchiveListing;
pub use inspection::list_archive;
