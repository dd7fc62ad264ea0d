//! Test utilities for building source trees and inspecting archives.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

/// Creates a source tree under `base/source` and returns its root.
///
/// Each item is a forward-slash relative file path; the file content is the
/// path itself. Items ending in `/` create empty directories.
///
/// # Examples
///
/// ```
/// use srcpack_core::test_utils::build_tree;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let root = build_tree(temp.path(), &["a.java", "sub/c.java", "empty/"]);
/// assert!(root.join("sub/c.java").is_file());
/// assert!(root.join("empty").is_dir());
/// ```
pub fn build_tree(base: &Path, files: &[&str]) -> PathBuf {
    let root = base.join("source");
    fs::create_dir_all(&root).unwrap();

    for item in files {
        let path = root.join(item);
        if item.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, item.as_bytes()).unwrap();
    }

    root
}

/// Returns the sorted entry names of the ZIP archive at `path`.
pub fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

/// Returns the content of entry `name` in the ZIP archive at `path`.
pub fn archive_entry_content(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}
