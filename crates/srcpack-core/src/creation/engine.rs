//! Archiving orchestration.

use crate::ArchiveError;
use crate::ArchiveProgress;
use crate::NoopProgress;
use crate::Result;
use crate::creation::config::ArchiveConfig;
use crate::creation::dedup::DedupTracker;
use crate::creation::pruner::DirectoryPruner;
use crate::creation::report::ArchiveResult;
use crate::creation::walker::SourceWalker;
use crate::creation::walker::WalkEntry;
use crate::creation::walker::WalkItem;
use crate::creation::writer::ArchiveWriter;
use crate::filter::FilterPolicy;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Builds a source archive from a directory tree or a single file.
///
/// The engine walks the source depth-first, skips subdirectories that cannot
/// contain an included file, applies the [`FilterPolicy`] to every file and,
/// when deduplication is enabled, keeps only the shallowest files of each
/// name.
///
/// # Examples
///
/// ```no_run
/// use srcpack_core::ArchiveConfig;
/// use srcpack_core::ArchivingEngine;
/// use srcpack_core::FilterPolicy;
/// use srcpack_core::PatternFilter;
/// use std::path::Path;
///
/// let policy = FilterPolicy::single(PatternFilter::new("*.java", "node_modules,target"));
/// let engine = ArchivingEngine::new(policy, ArchiveConfig::default());
///
/// let result = engine.archive(Path::new("project"), Path::new("upload.zip"), None)?;
/// println!("Archived {} files", result.file_count);
/// # Ok::<(), srcpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchivingEngine {
    policy: FilterPolicy,
    config: ArchiveConfig,
}

impl ArchivingEngine {
    /// Creates an engine with the given policy and configuration.
    #[must_use]
    pub fn new(policy: FilterPolicy, config: ArchiveConfig) -> Self {
        Self { policy, config }
    }

    /// Returns the filter policy.
    #[must_use]
    pub const fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Archives `source` into a new archive at `target`.
    ///
    /// `extra` is added at the archive root before the traversal, bypassing
    /// every filter. Any existing file at `target` is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - `source` or `extra` does not exist
    /// - A directory or file cannot be read during the traversal
    /// - The archive cannot be written
    ///
    /// On error no archive is left at `target`.
    pub fn archive(
        &self,
        source: &Path,
        target: &Path,
        extra: Option<&Path>,
    ) -> Result<ArchiveResult> {
        self.archive_with_progress(source, target, extra, &mut NoopProgress)
    }

    /// Archives `source` into `target`, reporting progress.
    ///
    /// # Errors
    ///
    /// Same as [`ArchivingEngine::archive`].
    pub fn archive_with_progress(
        &self,
        source: &Path,
        target: &Path,
        extra: Option<&Path>,
        progress: &mut dyn ArchiveProgress,
    ) -> Result<ArchiveResult> {
        let start = Instant::now();
        self.config.validate()?;

        let source_metadata = existing(source)?;
        if let Some(extra) = extra
            && !existing(extra)?.is_file()
        {
            return Err(ArchiveError::InvalidConfig {
                reason: format!("extra file is not a regular file: {}", extra.display()),
            });
        }

        info!("Archiving {} into {}", source.display(), target.display());

        let writer = ArchiveWriter::create(target, &self.config)?;
        let own_output = OwnOutput::new(&writer);
        let mut session = Session {
            writer,
            result: ArchiveResult::new(),
            progress,
            written: HashSet::new(),
            extra_name: None,
        };

        if let Some(extra) = extra {
            let name = root_entry_name(extra);
            debug!("Add: {name} (extra file)");
            session.write_entry(extra, &name)?;
            session.extra_name = Some(name);
        }

        if source_metadata.is_dir() {
            self.archive_directory(source, &own_output, &mut session)?;
        } else {
            self.archive_single_file(source, &mut session)?;
        }

        let Session {
            writer,
            mut result,
            progress,
            ..
        } = session;

        let finished = writer.finish()?;
        result.file_count = finished.entries;
        result.bytes_written = finished.bytes_written;
        result.archive_size = finished.archive_size;
        result.duration = start.elapsed();
        progress.on_complete();

        info!(
            "Archived {} files ({} bytes) into {}",
            result.file_count,
            result.bytes_written,
            target.display()
        );

        Ok(result)
    }

    fn archive_single_file(&self, source: &Path, session: &mut Session<'_>) -> Result<()> {
        let name = root_entry_name(source);
        if self.policy.is_included(&name) {
            debug!("Add: {name}");
            session.write_entry(source, &name)
        } else {
            debug!("Skip: {name} (filtered)");
            session.result.files_skipped += 1;
            Ok(())
        }
    }

    fn archive_directory(
        &self,
        source: &Path,
        own_output: &OwnOutput,
        session: &mut Session<'_>,
    ) -> Result<()> {
        let pruner = self
            .config
            .prune_directories
            .then(|| DirectoryPruner::new(self.policy.required()));
        let walker = SourceWalker::new(source, pruner);

        // Deduplication needs the shallowest occurrence of a name first, so
        // its candidates are written after the walk, ordered by depth.
        let mut candidates = Vec::new();

        for item in walker.walk() {
            match item? {
                WalkItem::File(entry) => {
                    if own_output.contains(&entry.path) {
                        debug!("Skip: {} (archive being written)", entry.relative_path);
                        continue;
                    }
                    if !self.policy.is_included(&entry.relative_path) {
                        debug!("Skip: {} (filtered)", entry.relative_path);
                        session.result.files_skipped += 1;
                        continue;
                    }
                    let below_root = entry.path.strip_prefix(source).unwrap_or(&entry.path);
                    if below_root.to_str().is_none() {
                        session.warn(format!(
                            "Non-UTF-8 file name archived as {}",
                            entry.relative_path
                        ));
                    }
                    if self.config.deduplicate {
                        candidates.push(entry);
                    } else {
                        debug!("Add: {}", entry.relative_path);
                        session.write_entry(&entry.path, &entry.relative_path)?;
                    }
                }
                WalkItem::Pruned { entry, .. } => {
                    session.result.directories_pruned += 1;
                    session.progress.on_directory_pruned(&entry.path);
                }
                WalkItem::Unsupported { entry, reason } => {
                    session.warn(format!("Skipped {}: {reason}", entry.relative_path));
                }
            }
        }

        if self.config.deduplicate {
            write_deduplicated(candidates, session)?;
        }

        Ok(())
    }
}

/// Archives `source` into `target` with the given policy and configuration.
///
/// Convenience wrapper around [`ArchivingEngine::archive`].
///
/// # Errors
///
/// Same as [`ArchivingEngine::archive`].
pub fn archive_source(
    source: &Path,
    target: &Path,
    extra: Option<&Path>,
    policy: &FilterPolicy,
    config: &ArchiveConfig,
) -> Result<ArchiveResult> {
    ArchivingEngine::new(policy.clone(), config.clone()).archive(source, target, extra)
}

struct Session<'p> {
    writer: ArchiveWriter,
    result: ArchiveResult,
    progress: &'p mut dyn ArchiveProgress,
    written: HashSet<String>,
    extra_name: Option<String>,
}

impl Session<'_> {
    /// Writes `path` as `entry_name` unless an entry of that name already
    /// exists. Distinct non-UTF-8 names can collapse to the same lossy name.
    fn write_entry(&mut self, path: &Path, entry_name: &str) -> Result<()> {
        if self.written.contains(entry_name) {
            let holder = if self.extra_name.as_deref() == Some(entry_name) {
                "an extra file"
            } else {
                "an entry"
            };
            self.warn(format!(
                "Skipped {entry_name}: {holder} with the same name is already archived"
            ));
            return Ok(());
        }
        self.writer.add_file(path, entry_name, &mut *self.progress)?;
        self.written.insert(entry_name.to_owned());
        Ok(())
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.result.add_warning(message);
    }
}

/// The files written by this call, which are skipped when the target lies
/// inside the source tree.
struct OwnOutput {
    paths: Vec<PathBuf>,
}

impl OwnOutput {
    fn new(writer: &ArchiveWriter) -> Self {
        let paths = [writer.temp_path(), writer.target()]
            .into_iter()
            .filter_map(canonical_output_path)
            .collect();
        Self { paths }
    }

    fn contains(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self.paths.iter().any(|own| own.file_name() == Some(name)) {
            return false;
        }
        fs::canonicalize(path).is_ok_and(|path| self.paths.contains(&path))
    }
}

fn canonical_output_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|parent| parent.join(name))
}

fn write_deduplicated(mut candidates: Vec<WalkEntry>, session: &mut Session<'_>) -> Result<()> {
    candidates.sort_by_key(WalkEntry::depth);

    let mut tracker = DedupTracker::new();
    for entry in candidates {
        let name = entry.file_name();
        if tracker.accept(name, &entry.relative_path) {
            debug!("Add: {}", entry.relative_path);
            session.write_entry(&entry.path, &entry.relative_path)?;
        } else {
            debug!(
                "Skip: {} (duplicate of {})",
                entry.relative_path,
                tracker.shallowest(name).unwrap_or(name)
            );
            session.result.duplicates_discarded += 1;
        }
    }

    Ok(())
}

fn existing(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ArchiveError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArchiveError::Io(e)
        }
    })
}

fn root_entry_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use crate::PatternFilter;
    use crate::test_utils::archive_entries;
    use crate::test_utils::build_tree;
    use tempfile::TempDir;

    fn engine(include: &str, exclude: &str) -> ArchivingEngine {
        ArchivingEngine::new(
            FilterPolicy::single(PatternFilter::new(include, exclude)),
            ArchiveConfig::default(),
        )
    }

    #[test]
    fn test_include_by_extension() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["a.java", "b.txt", "sub/c.java"]);
        let target = temp.path().join("out.zip");

        let result = engine("*.java", "").archive(&source, &target, None).unwrap();

        assert_eq!(result.file_count, 2);
        assert_eq!(result.files_skipped, 1);
        assert_eq!(archive_entries(&target), vec!["a.java", "sub/c.java"]);
    }

    #[test]
    fn test_excluded_folder_pruned() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["node_modules/x.js", "src/y.js"]);
        let target = temp.path().join("out.zip");

        let result = engine("", "node_modules")
            .archive(&source, &target, None)
            .unwrap();

        assert_eq!(archive_entries(&target), vec!["src/y.js"]);
        assert_eq!(result.directories_pruned, 1);
        assert_eq!(result.files_skipped, 0);
    }

    #[test]
    fn test_dedup_prefers_shallowest() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(
            temp.path(),
            &["a/b/config.json", "config.json", "nested/config.json"],
        );
        let target = temp.path().join("out.zip");

        let engine = ArchivingEngine::new(
            FilterPolicy::default(),
            ArchiveConfig::default().with_deduplicate(true),
        );
        let result = engine.archive(&source, &target, None).unwrap();

        assert_eq!(archive_entries(&target), vec!["config.json"]);
        assert_eq!(result.duplicates_discarded, 2);
    }

    #[test]
    fn test_single_file_source() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["pkg/pom.xml"]).join("pkg/pom.xml");
        let target = temp.path().join("out.zip");

        let result = engine("pom.xml", "").archive(&source, &target, None).unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(archive_entries(&target), vec!["pom.xml"]);

        let result = engine("*.gradle", "")
            .archive(&source, &target, None)
            .unwrap();
        assert_eq!(result.file_count, 0);
        assert!(archive_entries(&target).is_empty());
    }

    #[test]
    fn test_extra_file_bypasses_filters() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["src/a.js"]).join("src");
        let extra = temp.path().join("fingerprints.json");
        fs::write(&extra, "{}").unwrap();
        let target = temp.path().join("out.zip");

        let result = engine("", "**")
            .archive(&source, &target, Some(&extra))
            .unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(archive_entries(&target), vec!["fingerprints.json"]);
    }

    #[test]
    fn test_missing_source_fails_before_output() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.zip");

        let err = engine("", "")
            .archive(&temp.path().join("missing"), &target, None)
            .unwrap_err();

        assert!(matches!(err, ArchiveError::SourceNotFound { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_missing_extra_file_fails() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["a.txt"]);
        let target = temp.path().join("out.zip");

        let err = engine("", "")
            .archive(&source, &target, Some(&temp.path().join("nope.json")))
            .unwrap_err();

        assert!(matches!(err, ArchiveError::SourceNotFound { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_pruning_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["node_modules/x.js", "src/y.js"]);
        let target = temp.path().join("out.zip");

        let engine = ArchivingEngine::new(
            FilterPolicy::single(PatternFilter::new("", "node_modules")),
            ArchiveConfig::default().with_prune_directories(false),
        );
        let result = engine.archive(&source, &target, None).unwrap();

        assert_eq!(archive_entries(&target), vec!["src/y.js"]);
        assert_eq!(result.directories_pruned, 0);
        assert_eq!(result.files_skipped, 1);
    }

    #[test]
    fn test_target_inside_source_not_archived() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["a.txt"]);
        let target = source.join("out.zip");
        fs::write(&target, "previous archive").unwrap();

        let result = engine("", "").archive(&source, &target, None).unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(archive_entries(&target), vec!["a.txt"]);
    }

    #[test]
    fn test_tree_file_named_like_extra_file_skipped() {
        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["fingerprints.json", "a.txt"]);
        let extra = temp.path().join("fingerprints.json");
        fs::write(&extra, "{}").unwrap();
        let target = temp.path().join("out.zip");

        let result = engine("", "")
            .archive(&source, &target, Some(&extra))
            .unwrap();

        assert_eq!(result.file_count, 2);
        assert_eq!(archive_entries(&target), vec!["a.txt", "fingerprints.json"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("an extra file with the same name"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_lossy_name_collision_is_warning() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let source = build_tree(temp.path(), &["b.txt"]);
        fs::write(source.join(OsStr::from_bytes(b"a\xff.txt")), "ff").unwrap();
        fs::write(source.join(OsStr::from_bytes(b"a\xfe.txt")), "fe").unwrap();
        let target = temp.path().join("out.zip");

        let result = engine("", "").archive(&source, &target, None).unwrap();

        assert_eq!(result.file_count, 2);
        assert_eq!(archive_entries(&target), vec!["a\u{fffd}.txt", "b.txt"]);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("an entry with the same name"))
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_source_root_not_warned() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join(OsStr::from_bytes(b"src\xff"));
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        fs::create_dir(source.join("sub")).unwrap();
        fs::write(source.join("sub/b.txt"), "b").unwrap();
        let target = temp.path().join("out.zip");

        let result = engine("", "").archive(&source, &target, None).unwrap();

        assert_eq!(archive_entries(&target), vec!["a.txt", "sub/b.txt"]);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_root_entry_name() {
        assert_eq!(root_entry_name(Path::new("/tmp/x/report.json")), "report.json");
        assert_eq!(root_entry_name(Path::new("report.json")), "report.json");
    }
}
