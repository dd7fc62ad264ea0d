//! Depth-based deduplication of files sharing a name.

use std::collections::HashMap;

/// Keeps only the shallowest occurrences of each file name.
///
/// Depth is the number of `/` separators in the archive-relative path. Files
/// at equal smallest depth are all kept.
///
/// The tracker only knows about occurrences it has already seen: a deeper file
/// accepted before a shallower one with the same name stays accepted.
///
/// # Examples
///
/// ```
/// use srcpack_core::creation::DedupTracker;
///
/// let mut tracker = DedupTracker::new();
/// assert!(tracker.accept("config.json", "config.json"));
/// assert!(!tracker.accept("config.json", "nested/config.json"));
/// assert!(tracker.accept("pom.xml", "a/pom.xml"));
/// assert!(tracker.accept("pom.xml", "b/pom.xml"));
/// ```
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashMap<String, Vec<AcceptedPath>>,
}

#[derive(Debug)]
struct AcceptedPath {
    path: String,
    depth: usize,
}

impl DedupTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether the occurrence of `basename` at `relative_path` is
    /// kept, recording it if so.
    pub fn accept(&mut self, basename: &str, relative_path: &str) -> bool {
        let depth = path_depth(relative_path);
        let accepted = self.seen.entry(basename.to_string()).or_default();

        if accepted.iter().any(|prior| prior.depth < depth) {
            return false;
        }

        accepted.push(AcceptedPath {
            path: relative_path.to_string(),
            depth,
        });
        true
    }

    /// Returns a kept path with the smallest depth for `basename`.
    #[must_use]
    pub fn shallowest(&self, basename: &str) -> Option<&str> {
        self.seen
            .get(basename)?
            .iter()
            .min_by_key(|prior| prior.depth)
            .map(|prior| prior.path.as_str())
    }

    /// Number of distinct file names seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if nothing has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn path_depth(relative_path: &str) -> usize {
    relative_path.matches('/').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_is_accepted() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.accept("a.txt", "x/y/a.txt"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_deeper_duplicate_rejected() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.accept("config.json", "config.json"));
        assert!(!tracker.accept("config.json", "nested/config.json"));
        assert!(!tracker.accept("config.json", "a/b/config.json"));
        assert_eq!(tracker.shallowest("config.json"), Some("config.json"));
        assert_eq!(tracker.shallowest("other.json"), None);
    }

    #[test]
    fn test_equal_depth_keeps_all() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.accept("pom.xml", "a/pom.xml"));
        assert!(tracker.accept("pom.xml", "b/pom.xml"));
        assert!(tracker.accept("pom.xml", "c/pom.xml"));
    }

    #[test]
    fn test_shallower_after_deeper_is_accepted() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.accept("x.cfg", "a/b/x.cfg"));
        assert!(tracker.accept("x.cfg", "x.cfg"));
        // the shallower one now blocks further deep occurrences
        assert!(!tracker.accept("x.cfg", "c/x.cfg"));
    }

    #[test]
    fn test_names_are_independent() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.accept("a", "a"));
        assert!(tracker.accept("b", "deep/dir/b"));
        assert_eq!(tracker.len(), 2);
    }
}
