//! Include/exclude path filter built from comma-separated specifications.

use crate::filter::glob::CompiledGlob;
use crate::filter::glob::has_wildcard;

/// Filters relative paths by one include specification and one exclude
/// specification.
///
/// Both specifications are comma-separated lists that are translated into
/// glob patterns:
///
/// | Include item           | Glob                  |
/// |------------------------|-----------------------|
/// | `java` or `.java`      | `**/*.java`           |
/// | `*.java`, `*helper.js` | `**/*.java`, ...      |
/// | `package.json`         | `**/package.json`     |
/// | `src/**/*.c`           | `src/**/*.c`          |
/// | `!*.min.js`            | exclude `**/*.min.js` |
///
/// | Exclude item        | Glob                   |
/// |---------------------|------------------------|
/// | `node_modules`      | `**/node_modules/**`   |
/// | `web/dist`          | `**/web/dist/**`       |
/// | `**/generated/**`   | `**/generated/**`      |
///
/// # Examples
///
/// ```
/// use srcpack_core::PatternFilter;
///
/// let filter = PatternFilter::new("*.java, .kt", "node_modules, build");
/// assert!(filter.matches_file("src/App.java"));
/// assert!(filter.matches_file("Main.kt"));
/// assert!(!filter.matches_file("README.md"));
/// assert!(!filter.matches_file("build/gen/App.java"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    include: Vec<CompiledGlob>,
    exclude: Vec<CompiledGlob>,
}

impl PatternFilter {
    /// Creates a filter from comma-separated include and exclude
    /// specifications.
    ///
    /// Empty items are ignored. An empty include specification matches every
    /// path.
    #[must_use]
    pub fn new(include_spec: &str, exclude_spec: &str) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for item in spec_items(include_spec) {
            if let Some(negated) = item.strip_prefix('!') {
                let negated = clean_item(negated);
                if !negated.is_empty() {
                    exclude.push(CompiledGlob::new(&include_glob(&negated)));
                }
            } else {
                include.push(CompiledGlob::new(&include_glob(item)));
            }
        }
        for item in spec_items(exclude_spec) {
            exclude.push(CompiledGlob::new(&exclude_glob(item)));
        }

        include.retain(|glob| !glob.is_empty());
        exclude.retain(|glob| !glob.is_empty());

        Self { include, exclude }
    }

    /// Creates a filter that includes exactly the files called `name`,
    /// anywhere in the tree.
    #[must_use]
    pub fn file_name(name: &str) -> Self {
        let name = clean_item(name);
        let include = if name.is_empty() {
            Vec::new()
        } else {
            vec![CompiledGlob::new(&format!("**/{name}"))]
        };
        Self {
            include,
            exclude: Vec::new(),
        }
    }

    /// Returns `true` if `path` is selected by this filter.
    ///
    /// A path is selected when it matches at least one include pattern (or no
    /// include pattern is defined) and matches no exclude pattern.
    #[must_use]
    pub fn matches_file(&self, path: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|g| g.is_match(path));
        included && !self.exclude.iter().any(|g| g.is_match(path))
    }

    /// Returns `true` if at least one include pattern was supplied.
    #[must_use]
    pub fn has_include_patterns(&self) -> bool {
        !self.include.is_empty()
    }

    /// Compiled include patterns.
    #[must_use]
    pub fn include_patterns(&self) -> &[CompiledGlob] {
        &self.include
    }

    /// Compiled exclude patterns.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[CompiledGlob] {
        &self.exclude
    }

    /// Returns `true` if some file strictly below `dir` could be selected by
    /// this filter.
    ///
    /// `dir` is a forward-slash relative directory path. The answer may be
    /// `true` for a directory that turns out to hold no selected file, but it
    /// is never `false` for a directory that does.
    #[must_use]
    pub fn could_select_under(&self, dir: &str) -> bool {
        let reachable =
            self.include.is_empty() || self.include.iter().any(|g| g.could_match_under(dir));
        reachable && !self.exclude.iter().any(|g| g.matches_everything_under(dir))
    }

    /// Returns `true` if an exclude pattern names the directory `name`
    /// anywhere in the tree (`**/name/**` and its shorter forms).
    #[must_use]
    pub fn excludes_directory_name(&self, name: &str) -> bool {
        self.exclude.iter().any(|g| g.names_directory(name))
    }
}

/// Splits a comma-separated specification into trimmed, non-empty items.
fn spec_items(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// Normalizes separators and strips leading `./` and `/`.
fn clean_item(item: &str) -> String {
    let mut item = item.trim().replace('\\', "/");
    loop {
        if let Some(rest) = item.strip_prefix("./") {
            item = rest.to_string();
        } else if let Some(rest) = item.strip_prefix('/') {
            item = rest.to_string();
        } else {
            return item;
        }
    }
}

fn include_glob(item: &str) -> String {
    let item = clean_item(item);

    if item.contains('/') {
        return item;
    }
    if has_wildcard(&item) {
        return format!("**/{item}");
    }
    if let Some(ext) = item.strip_prefix('.')
        && !ext.is_empty()
        && !ext.contains('.')
    {
        return format!("**/*.{ext}");
    }
    if item.contains('.') {
        return format!("**/{item}");
    }
    format!("**/*.{item}")
}

fn exclude_glob(item: &str) -> String {
    let item = clean_item(item);
    if item.contains("**") {
        return item;
    }
    let folder = item.trim_end_matches('/');
    if folder.is_empty() {
        return String::new();
    }
    format!("**/{folder}/**")
}
