//! Conjunctive/disjunctive composition of pattern filters.

use crate::ArchiveError;
use crate::Result;
use crate::filter::pattern::PatternFilter;

/// Inclusion policy composed of required and alternative filters.
///
/// A path is included when every required filter selects it and, if any
/// alternative filters are present, at least one of them selects it too. A
/// policy with no filters at all includes everything.
///
/// # Examples
///
/// ```
/// use srcpack_core::FilterPolicy;
/// use srcpack_core::PatternFilter;
///
/// let policy = FilterPolicy::default()
///     .with_required(PatternFilter::new("", "node_modules"))
///     .with_alternative(PatternFilter::new("package.json", ""))
///     .with_alternative(PatternFilter::new("yarn.lock", ""));
///
/// assert!(policy.is_included("web/package.json"));
/// assert!(policy.is_included("yarn.lock"));
/// assert!(!policy.is_included("node_modules/left-pad/package.json"));
/// assert!(!policy.is_included("src/index.js"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    required: Vec<PatternFilter>,
    alternatives: Vec<PatternFilter>,
}

impl FilterPolicy {
    /// Creates a policy from explicit required and alternative filters.
    #[must_use]
    pub fn new(required: Vec<PatternFilter>, alternatives: Vec<PatternFilter>) -> Self {
        Self {
            required,
            alternatives,
        }
    }

    /// Creates a policy with a single required filter.
    #[must_use]
    pub fn single(filter: PatternFilter) -> Self {
        Self::new(vec![filter], Vec::new())
    }

    /// Creates the policy for manifest-only archiving.
    ///
    /// `dependency` is required; `manifests` becomes an alternative, as does a
    /// filter for `fingerprint_file_name` when one is given, so the inlined
    /// fingerprint file survives when the archive is re-filtered downstream.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidConfig`] if `manifests` defines no
    /// include pattern, since an empty alternative would select every file.
    pub fn manifest_only(
        dependency: PatternFilter,
        manifests: PatternFilter,
        fingerprint_file_name: Option<&str>,
    ) -> Result<Self> {
        if !manifests.has_include_patterns() {
            return Err(ArchiveError::InvalidConfig {
                reason: "manifest-only archiving requires at least one manifest include pattern"
                    .to_string(),
            });
        }

        let mut policy = Self::single(dependency).with_alternative(manifests);
        if let Some(name) = fingerprint_file_name {
            let fingerprint = PatternFilter::file_name(name);
            if fingerprint.has_include_patterns() {
                policy = policy.with_alternative(fingerprint);
            }
        }
        Ok(policy)
    }

    /// Adds a required filter.
    #[must_use]
    pub fn with_required(mut self, filter: PatternFilter) -> Self {
        self.required.push(filter);
        self
    }

    /// Adds an alternative filter.
    #[must_use]
    pub fn with_alternative(mut self, filter: PatternFilter) -> Self {
        self.alternatives.push(filter);
        self
    }

    /// Filters that must all select a path.
    #[must_use]
    pub fn required(&self) -> &[PatternFilter] {
        &self.required
    }

    /// Filters of which at least one must select a path, when non-empty.
    #[must_use]
    pub fn alternatives(&self) -> &[PatternFilter] {
        &self.alternatives
    }

    /// Returns `true` if `path` is included by this policy.
    #[must_use]
    pub fn is_included(&self, path: &str) -> bool {
        self.required.iter().all(|f| f.matches_file(path))
            && (self.alternatives.is_empty() || self.alternatives.iter().any(|f| f.matches_file(path)))
    }
}
