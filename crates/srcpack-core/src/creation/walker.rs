//! Source tree traversal with directory pruning.
//!
//! The walker is depth-first and pull-based: the next entry is only read from
//! the filesystem when the caller asks for it, so the caller's per-entry work
//! (filtering, compressing a file) always completes before the walk resumes.

use crate::Result;
use crate::creation::pruner::DirectoryPruner;
use crate::creation::pruner::PruneDecision;
use crate::creation::pruner::PruneReason;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of a discovered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, or a symlink resolving to one.
    File,
    /// Directory, or a symlink resolving to one.
    Directory,
    /// Anything else (sockets, FIFOs, devices, dangling links).
    Other,
}

/// A discovered filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Forward-slash path relative to the walk root, without a leading `/`
    /// and without `.`/`..` segments.
    pub relative_path: String,

    /// Kind of the entry (after resolving symlinks).
    pub kind: EntryKind,

    /// Whether the entry itself is a symbolic link.
    pub is_symlink: bool,
}

impl WalkEntry {
    /// Last segment of the relative path.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Number of `/` separators in the relative path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative_path.matches('/').count()
    }
}

/// One step of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// A file to consider for the archive.
    File(WalkEntry),
    /// A directory that was not entered.
    Pruned {
        /// The skipped directory.
        entry: WalkEntry,
        /// Why it was skipped.
        reason: PruneReason,
    },
    /// An entry that cannot be archived.
    Unsupported {
        /// The skipped entry.
        entry: WalkEntry,
        /// What is wrong with it.
        reason: String,
    },
}

/// Walks a source directory, consulting a [`DirectoryPruner`] before entering
/// each subdirectory.
///
/// Without a pruner every real subdirectory is visited. Symbolic links to
/// directories are never followed either way.
///
/// # Examples
///
/// ```no_run
/// use srcpack_core::PatternFilter;
/// use srcpack_core::creation::pruner::DirectoryPruner;
/// use srcpack_core::creation::walker::SourceWalker;
/// use srcpack_core::creation::walker::WalkItem;
/// use std::path::Path;
///
/// let filters = [PatternFilter::new("*.rs", "target")];
/// let walker = SourceWalker::new(Path::new("."), Some(DirectoryPruner::new(&filters)));
///
/// for item in walker.walk() {
///     if let WalkItem::File(entry) = item? {
///         println!("{}", entry.relative_path);
///     }
/// }
/// # Ok::<(), srcpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SourceWalker<'a> {
    root: &'a Path,
    pruner: Option<DirectoryPruner<'a>>,
}

impl<'a> SourceWalker<'a> {
    /// Creates a walker for `root`.
    #[must_use]
    pub fn new(root: &'a Path, pruner: Option<DirectoryPruner<'a>>) -> Self {
        Self { root, pruner }
    }

    /// Returns an iterator over the entries below the root.
    ///
    /// Entries within a directory are visited in file-name order.
    ///
    /// # Errors
    ///
    /// Items are errors when a directory cannot be read or an entry's type
    /// cannot be determined. The walk should be abandoned on the first error.
    #[must_use]
    pub fn walk(&self) -> Walk<'a> {
        let inner = WalkDir::new(self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        Walk {
            root: self.root,
            pruner: self.pruner,
            inner,
        }
    }
}

/// Iterator returned by [`SourceWalker::walk`].
pub struct Walk<'a> {
    root: &'a Path,
    pruner: Option<DirectoryPruner<'a>>,
    inner: walkdir::IntoIter,
}

impl Walk<'_> {
    fn entry(&self, path: &Path, kind: EntryKind, is_symlink: bool) -> WalkEntry {
        WalkEntry {
            path: path.to_path_buf(),
            relative_path: relative_path(self.root, path),
            kind,
            is_symlink,
        }
    }

    fn classify_symlink(&self, path: &Path) -> WalkItem {
        match fs::metadata(path) {
            Ok(target) if target.is_dir() => {
                let entry = self.entry(path, EntryKind::Directory, true);
                let pruner = self.pruner.unwrap_or(DirectoryPruner::new(&[]));
                let reason = match pruner.decide(&entry.relative_path, true) {
                    PruneDecision::Prune(reason) => reason,
                    PruneDecision::Descend => PruneReason::Symlink,
                };
                WalkItem::Pruned { entry, reason }
            }
            Ok(target) if target.is_file() => WalkItem::File(self.entry(path, EntryKind::File, true)),
            Ok(_) => WalkItem::Unsupported {
                entry: self.entry(path, EntryKind::Other, true),
                reason: "symbolic link to a special file".to_string(),
            },
            Err(e) => WalkItem::Unsupported {
                entry: self.entry(path, EntryKind::Other, true),
                reason: format!("dangling symbolic link ({e})"),
            },
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dir_entry = match self.inner.next()? {
                Ok(dir_entry) => dir_entry,
                Err(e) => return Some(Err(e.into())),
            };
            let path = dir_entry.path();
            let file_type = dir_entry.file_type();

            if file_type.is_dir() {
                let Some(pruner) = self.pruner else {
                    continue;
                };
                let entry = self.entry(path, EntryKind::Directory, false);
                match pruner.decide(&entry.relative_path, false) {
                    PruneDecision::Descend => continue,
                    PruneDecision::Prune(reason) => {
                        self.inner.skip_current_dir();
                        return Some(Ok(WalkItem::Pruned { entry, reason }));
                    }
                }
            }

            if file_type.is_symlink() {
                return Some(Ok(self.classify_symlink(path)));
            }

            if file_type.is_file() {
                return Some(Ok(WalkItem::File(self.entry(
                    path,
                    EntryKind::File,
                    false,
                ))));
            }

            return Some(Ok(WalkItem::Unsupported {
                entry: self.entry(path, EntryKind::Other, false),
                reason: "not a regular file".to_string(),
            }));
        }
    }
}

/// Computes the forward-slash path of `path` relative to `root`.
///
/// Non-UTF-8 components are rendered lossily; `.` and `..` components are
/// dropped.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
