//! Glob compilation for path filters.
//!
//! A pattern is compiled once into a list of path segments. `**` matches zero
//! or more whole segments; every other segment is either a literal or a
//! single-segment wildcard backed by [`globset`] (where `*` never crosses a
//! `/`). Matching runs a small set-of-positions automaton over the segments of
//! a relative path, which lets the same compiled form answer three questions:
//!
//! - does this exact path match ([`CompiledGlob::is_match`]);
//! - could some path strictly below a directory match
//!   ([`CompiledGlob::could_match_under`]);
//! - does every path strictly below a directory match
//!   ([`CompiledGlob::matches_everything_under`]).
//!
//! Because all three are derived from one automaton they can never disagree,
//! which is what makes directory pruning sound.

use globset::GlobBuilder;
use globset::GlobMatcher;
use std::fmt;
use tracing::warn;

/// One compiled path segment.
#[derive(Clone)]
enum Segment {
    /// `**`: zero or more whole segments.
    AnyPath,
    /// Exact, case-sensitive segment text.
    Literal(String),
    /// Wildcard confined to a single segment.
    Wildcard(GlobMatcher),
}

impl Segment {
    fn compile(text: &str) -> Self {
        if text == "**" {
            return Self::AnyPath;
        }
        if !has_wildcard(text) {
            return Self::Literal(text.to_string());
        }

        // `**` only means "any segments" as a whole segment
        let mut normalized = text.to_string();
        while normalized.contains("**") {
            normalized = normalized.replace("**", "*");
        }

        match GlobBuilder::new(&normalized)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
        {
            Ok(glob) => Self::Wildcard(glob.compile_matcher()),
            Err(e) => {
                warn!("Glob segment '{text}' is not valid ({e}), matching it literally");
                Self::Literal(text.to_string())
            }
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::AnyPath => true,
            Self::Literal(literal) => literal == segment,
            Self::Wildcard(matcher) => matcher.is_match(segment),
        }
    }
}

/// A glob pattern compiled for segment-wise matching.
///
/// # Examples
///
/// ```
/// use srcpack_core::filter::CompiledGlob;
///
/// let glob = CompiledGlob::new("**/*.java");
/// assert!(glob.is_match("Main.java"));
/// assert!(glob.is_match("src/main/App.java"));
/// assert!(!glob.is_match("src/App.javax"));
///
/// let nested = CompiledGlob::new("node_modules/special/manifest.json");
/// assert!(nested.could_match_under("node_modules/"));
/// assert!(!nested.could_match_under("vendor/"));
/// ```
#[derive(Clone)]
pub struct CompiledGlob {
    pattern: String,
    segments: Vec<Segment>,
}

impl CompiledGlob {
    /// Compiles a pattern.
    ///
    /// Never fails: backslashes are treated as separators, empty and `.`
    /// segments are dropped, and wildcard segments that cannot be compiled are
    /// matched literally.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let normalized = pattern.trim().replace('\\', "/");
        let segments = split_segments(&normalized)
            .map(Segment::compile)
            .collect::<Vec<_>>();
        let pattern = split_segments(&normalized).collect::<Vec<_>>().join("/");
        Self { pattern, segments }
    }

    /// Returns the normalized pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the pattern has no segments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if `path` matches the whole pattern.
    ///
    /// `path` is a forward-slash relative path. A trailing `/` is ignored, so
    /// a directory path is matched as if it were a file of the same name.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.positions_after(path)
            .last()
            .copied()
            .unwrap_or(false)
    }

    /// Returns `true` if some path strictly below `dir` could match.
    ///
    /// This is an over-approximation only in one respect: a wildcard segment
    /// is assumed to match some name.
    #[must_use]
    pub fn could_match_under(&self, dir: &str) -> bool {
        let positions = self.positions_after(dir);
        let n = self.segments.len();
        positions[..n].iter().any(|&reachable| reachable)
    }

    /// Returns `true` if every path strictly below `dir` matches.
    #[must_use]
    pub fn matches_everything_under(&self, dir: &str) -> bool {
        let positions = self.positions_after(dir);
        let n = self.segments.len();
        (0..n).any(|i| {
            positions[i]
                && self.segments[i..]
                    .iter()
                    .all(|segment| matches!(segment, Segment::AnyPath))
        })
    }

    /// Returns `true` if the pattern is structurally "this name, anywhere in
    /// the tree": after stripping a leading `**/` and a trailing `/**` the
    /// pattern is exactly the literal `name`.
    #[must_use]
    pub fn names_directory(&self, name: &str) -> bool {
        let mut core = self.segments.as_slice();
        if let [Segment::AnyPath, rest @ ..] = core {
            core = rest;
        }
        if let [rest @ .., Segment::AnyPath] = core {
            core = rest;
        }
        matches!(core, [Segment::Literal(literal)] if literal == name)
    }

    /// Runs the automaton over the segments of `path` and returns the set of
    /// reachable pattern positions (`0..=n`).
    fn positions_after(&self, path: &str) -> Vec<bool> {
        let n = self.segments.len();
        let mut current = vec![false; n + 1];
        current[0] = true;
        self.close(&mut current);

        for part in split_segments(path) {
            let mut next = vec![false; n + 1];
            for i in 0..n {
                if !current[i] {
                    continue;
                }
                match &self.segments[i] {
                    Segment::AnyPath => next[i] = true,
                    segment if segment.matches(part) => next[i + 1] = true,
                    _ => {}
                }
            }
            self.close(&mut next);
            if !next.iter().any(|&reachable| reachable) {
                return next;
            }
            current = next;
        }

        current
    }

    /// Adds positions reachable by letting `**` match zero segments.
    fn close(&self, positions: &mut [bool]) {
        for i in 0..self.segments.len() {
            if positions[i] && matches!(self.segments[i], Segment::AnyPath) {
                positions[i + 1] = true;
            }
        }
    }
}

impl fmt::Debug for CompiledGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledGlob").field(&self.pattern).finish()
    }
}

impl fmt::Display for CompiledGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Splits a relative path into its non-empty segments, skipping `.`.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
}

/// Returns `true` if `text` contains a glob metacharacter.
pub(crate) fn has_wildcard(text: &str) -> bool {
    text.contains(['*', '?', '[', '{'])
}
