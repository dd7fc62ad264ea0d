//! Directory pruning decisions.
//!
//! Pruning is a pure performance optimization: a subdirectory is skipped only
//! when no file below it could be included by the required filters of the
//! policy. Alternative filters are not consulted; since a file must pass every
//! required filter to be included at all, they cannot re-open a directory that
//! the required filters have closed.

use crate::filter::PatternFilter;
use tracing::debug;

/// Why a directory was pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// `.` or `..`.
    Synthetic,
    /// The directory is a symbolic link; links are never followed.
    Symlink,
    /// An exclude pattern names the directory and nothing re-opens it.
    ExcludedByName,
    /// No required filter can select anything below the directory.
    NoMatchBelow,
}

/// Outcome of a pruning decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneDecision {
    /// Visit the directory's contents.
    Descend,
    /// Skip the directory and everything below it.
    Prune(PruneReason),
}

impl PruneDecision {
    /// Returns `true` if the directory should be visited.
    #[must_use]
    pub const fn is_descend(self) -> bool {
        matches!(self, Self::Descend)
    }
}

/// Decides whether the walker should descend into a subdirectory.
///
/// # Examples
///
/// ```
/// use srcpack_core::PatternFilter;
/// use srcpack_core::creation::pruner::DirectoryPruner;
/// use srcpack_core::creation::pruner::PruneDecision;
/// use srcpack_core::creation::pruner::PruneReason;
///
/// let filters = [PatternFilter::new("", "node_modules")];
/// let pruner = DirectoryPruner::new(&filters);
///
/// assert_eq!(pruner.decide("src/", false), PruneDecision::Descend);
/// assert_eq!(
///     pruner.decide("node_modules/", false),
///     PruneDecision::Prune(PruneReason::ExcludedByName)
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DirectoryPruner<'a> {
    required: &'a [PatternFilter],
}

impl<'a> DirectoryPruner<'a> {
    /// Creates a pruner over the required filters of a policy.
    #[must_use]
    pub fn new(required: &'a [PatternFilter]) -> Self {
        Self { required }
    }

    /// Decides whether to descend into the directory at `relative_dir`.
    ///
    /// `relative_dir` is the forward-slash path of the directory relative to
    /// the archive root, with or without a trailing `/`.
    #[must_use]
    pub fn decide(&self, relative_dir: &str, is_symlink: bool) -> PruneDecision {
        let trimmed = relative_dir.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);

        if name == "." || name == ".." {
            return PruneDecision::Prune(PruneReason::Synthetic);
        }
        if is_symlink {
            debug!("Prune: {trimmed}/ (symbolic link)");
            return PruneDecision::Prune(PruneReason::Symlink);
        }

        let dir = format!("{trimmed}/");
        let excluded_by_name = self
            .required
            .iter()
            .any(|f| f.excludes_directory_name(name));

        if self.directory_passes_filter(&dir) || self.has_inclusions_below(&dir) {
            return PruneDecision::Descend;
        }

        if excluded_by_name {
            debug!("Prune: {dir} (excluded folder)");
            PruneDecision::Prune(PruneReason::ExcludedByName)
        } else {
            debug!("Prune: {dir} (no include pattern reaches inside)");
            PruneDecision::Prune(PruneReason::NoMatchBelow)
        }
    }

    /// Every required filter selects the directory's own path.
    fn directory_passes_filter(&self, dir: &str) -> bool {
        self.required.iter().all(|f| f.matches_file(dir))
    }

    /// Every required filter could still select something strictly inside
    /// the directory.
    fn has_inclusions_below(&self, dir: &str) -> bool {
        self.required.iter().all(|f| f.could_select_under(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(filters: &[PatternFilter], dir: &str) -> PruneDecision {
        DirectoryPruner::new(filters).decide(dir, false)
    }

    #[test]
    fn test_synthetic_entries_pruned() {
        let filters = [PatternFilter::default()];
        assert_eq!(
            decide(&filters, "."),
            PruneDecision::Prune(PruneReason::Synthetic)
        );
        assert_eq!(
            decide(&filters, "a/../"),
            PruneDecision::Prune(PruneReason::Synthetic)
        );
    }

    #[test]
    fn test_symlinks_pruned() {
        let filters = [PatternFilter::default()];
        let pruner = DirectoryPruner::new(&filters);
        assert_eq!(
            pruner.decide("linked/", true),
            PruneDecision::Prune(PruneReason::Symlink)
        );
    }

    #[test]
    fn test_no_filters_descends_everywhere() {
        assert!(decide(&[], "anything/").is_descend());
        assert!(decide(&[PatternFilter::default()], "a/b/c/").is_descend());
    }

    #[test]
    fn test_excluded_folder_pruned_at_any_depth() {
        let filters = [PatternFilter::new("*.js", "node_modules")];
        assert!(decide(&filters, "src/").is_descend());
        assert_eq!(
            decide(&filters, "node_modules/"),
            PruneDecision::Prune(PruneReason::ExcludedByName)
        );
        assert_eq!(
            decide(&filters, "packages/web/node_modules"),
            PruneDecision::Prune(PruneReason::ExcludedByName)
        );
    }

    #[test]
    fn test_literal_include_keeps_only_its_path_open() {
        let filters = [PatternFilter::new("config/app/settings.yml", "")];
        assert!(decide(&filters, "config/").is_descend());
        assert!(decide(&filters, "config/app/").is_descend());
        assert_eq!(
            decide(&filters, "src/"),
            PruneDecision::Prune(PruneReason::NoMatchBelow)
        );
    }

    #[test]
    fn test_exclude_in_one_filter_closes_directory_for_all() {
        let filters = [
            PatternFilter::new("*.json", ""),
            PatternFilter::new("", "vendor"),
        ];
        assert!(decide(&filters, "src/").is_descend());
        assert_eq!(
            decide(&filters, "vendor/"),
            PruneDecision::Prune(PruneReason::ExcludedByName)
        );
    }

    #[test]
    fn test_nested_exclude_path_keeps_parent_open() {
        let filters = [PatternFilter::new("", "web/dist")];
        assert!(decide(&filters, "web/").is_descend());
        assert!(decide(&filters, "dist/").is_descend());
        assert_eq!(
            decide(&filters, "web/dist/"),
            PruneDecision::Prune(PruneReason::NoMatchBelow)
        );
    }

    #[test]
    fn test_exclude_by_file_pattern_does_not_prune() {
        let filters = [PatternFilter::new("", "**/*.min.js")];
        assert!(decide(&filters, "dist/").is_descend());
    }
}
