//! Archive creation.
//!
//! The [`ArchivingEngine`] drives a [`SourceWalker`] over the source tree,
//! asking a [`DirectoryPruner`] before entering each subdirectory, and streams
//! the files approved by the filter policy (and the [`DedupTracker`], when
//! enabled) into an [`ArchiveWriter`].

pub mod config;
pub mod dedup;
pub mod engine;
pub mod progress;
pub mod pruner;
pub mod report;
pub mod walker;
pub mod writer;

// Re-exports for public API
pub use config::ArchiveConfig;
pub use dedup::DedupTracker;
pub use engine::ArchivingEngine;
pub use engine::archive_source;
pub use progress::ArchiveProgress;
pub use progress::NoopProgress;
pub use pruner::DirectoryPruner;
pub use pruner::PruneDecision;
pub use pruner::PruneReason;
pub use report::ArchiveResult;
pub use walker::EntryKind;
pub use walker::SourceWalker;
pub use walker::WalkEntry;
pub use walker::WalkItem;
pub use writer::ArchiveWriter;
