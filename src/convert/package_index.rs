//! Package boundary index.
//!
//! A package is a directory containing a module definition file. Every path
//! in the workspace belongs to its nearest enclosing package; the workspace
//! root is always a package.

use std::collections::BTreeSet;

use crate::core::path;
use crate::core::FileTree;

/// Immutable map of package boundaries, built once per conversion run.
///
/// Lookups take `&self` only, so one index can be shared by all conversion
/// workers.
#[derive(Debug, Clone)]
pub struct PackageIndex {
    packages: BTreeSet<String>,
}

impl PackageIndex {
    /// Scan a snapshot for directories holding any of `marker_files`.
    pub fn build<S: AsRef<str>>(tree: &FileTree, marker_files: &[S]) -> Self {
        let mut packages = BTreeSet::new();
        packages.insert(String::new());

        for (p, entry) in tree.paths() {
            if entry.is_dir || !entry.exists {
                continue;
            }
            let name = path::file_name(p);
            if marker_files.iter().any(|m| m.as_ref() == name) {
                if let Some(dir) = path::parent(p) {
                    packages.insert(dir.to_string());
                }
            }
        }

        PackageIndex { packages }
    }

    /// Build an index from an explicit list of package directories.
    pub fn from_packages<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut packages: BTreeSet<String> =
            dirs.into_iter().map(|d| path::normalize(d.as_ref())).collect();
        packages.insert(String::new());
        PackageIndex { packages }
    }

    /// The nearest package at or above `p`.
    ///
    /// A package directory maps to itself; anything else maps to its closest
    /// ancestor package, falling back to the root.
    pub fn nearest_package<'a>(&'a self, p: &str) -> &'a str {
        path::ancestors(p)
            .find_map(|dir| self.packages.get(dir))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// True if `dir` is itself a package boundary.
    pub fn is_package(&self, dir: &str) -> bool {
        self.packages.contains(dir)
    }

    /// All packages, sorted by path.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }
}
