//! Header collection across package boundaries.
//!
//! Given an include directory, the resolver walks the snapshot below it and
//! collects header files. A header owned by the consuming module's package is
//! emitted as a package-relative path; a header owned by any other package is
//! emitted as a label, `//<package>:<path-in-package>`.

use crate::convert::package_index::PackageIndex;
use crate::core::path;
use crate::core::FileTree;

/// A header found below an include directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    /// Path or label as it appears in the rule
    pub display: String,
    /// True if the header belongs to another package
    pub cross_package: bool,
}

/// A path the walk expected but the snapshot does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPath(pub String);

/// Resolves include directories to header lists.
pub struct PathResolver<'a> {
    tree: &'a FileTree,
    index: &'a PackageIndex,
    header_extensions: &'a [String],
}

impl<'a> PathResolver<'a> {
    pub fn new(tree: &'a FileTree, index: &'a PackageIndex, header_extensions: &'a [String]) -> Self {
        PathResolver {
            tree,
            index,
            header_extensions,
        }
    }

    /// True if the file name carries one of the header extensions.
    pub fn is_header(&self, file: &str) -> bool {
        let name = path::file_name(file);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                self.header_extensions.iter().any(|e| e == ext)
            }
            _ => false,
        }
    }

    /// Collect the headers below `include_dir` as seen from `module_package`.
    ///
    /// Headers are grouped by owning package, groups in the order their
    /// package is first reached by the walk. The walk visits the files of a
    /// directory before descending into its subdirectories, both in path
    /// order, so headers directly inside `include_dir` come first.
    pub fn resolve(
        &self,
        module_package: &str,
        include_dir: &str,
    ) -> Result<Vec<ResolvedHeader>, MissingPath> {
        if !self.tree.is_dir(include_dir) {
            return Err(MissingPath(include_dir.to_string()));
        }

        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        self.walk(include_dir, &mut groups)?;

        let mut headers = Vec::new();
        for (package, files) in groups {
            let cross_package = package != module_package;
            for file in files {
                let in_package = path::strip_dir(file, package).unwrap_or(file);
                let display = if cross_package {
                    format!("//{}:{}", package, in_package)
                } else {
                    in_package.to_string()
                };
                headers.push(ResolvedHeader {
                    display,
                    cross_package,
                });
            }
        }
        Ok(headers)
    }

    /// Header files owned by `package`, relative to the package directory.
    ///
    /// The walk order is the same as for `resolve`, but subdirectories that
    /// are packages of their own are not entered.
    pub fn package_headers(&self, package: &str) -> Result<Vec<String>, MissingPath> {
        if !self.tree.is_dir(package) {
            return Err(MissingPath(package.to_string()));
        }
        let mut files = Vec::new();
        self.walk_package(package, &mut files)?;
        Ok(files
            .into_iter()
            .map(|f| path::strip_dir(f, package).unwrap_or(f).to_string())
            .collect())
    }

    fn walk_package(&self, dir: &str, out: &mut Vec<&'a str>) -> Result<(), MissingPath> {
        let children = self.tree.children(dir);
        for (file, entry) in children.files {
            if !self.is_header(file) {
                continue;
            }
            if !entry.exists {
                return Err(MissingPath(file.to_string()));
            }
            out.push(file);
        }
        for (sub, entry) in children.dirs {
            if self.index.is_package(sub) {
                continue;
            }
            if !entry.exists {
                return Err(MissingPath(sub.to_string()));
            }
            self.walk_package(sub, out)?;
        }
        Ok(())
    }

    fn walk(&self, dir: &str, groups: &mut Vec<(&'a str, Vec<&'a str>)>) -> Result<(), MissingPath> {
        let children = self.tree.children(dir);

        for (file, entry) in children.files {
            if !self.is_header(file) {
                continue;
            }
            if !entry.exists {
                return Err(MissingPath(file.to_string()));
            }
            let package = self.index.nearest_package(dir);
            match groups.iter_mut().find(|(p, _)| *p == package) {
                Some((_, files)) => files.push(file),
                None => groups.push((package, vec![file])),
            }
        }

        for (sub, entry) in children.dirs {
            if !entry.exists {
                return Err(MissingPath(sub.to_string()));
            }
            self.walk(sub, groups)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["h".to_string()]
    }

    fn nested_packages() -> FileTree {
        FileTree::from_files([
            "subpackage/Android.bp",
            "subpackage/subpackage_header.h",
            "subpackage/subdirectory/subdirectory_header.h",
            "subpackage/subsubpackage/Android.bp",
            "subpackage/subsubpackage/subsubpackage_header.h",
            "subpackage/subsubpackage/subdirectory/subdirectory_header.h",
            "subpackage/subsubpackage/subsubsubpackage/Android.bp",
            "subpackage/subsubpackage/subsubsubpackage/subsubsubpackage_header.h",
            "subpackage/subsubpackage/subsubsubpackage/subdirectory/subdirectory_header.h",
        ])
    }

    fn displays(headers: &[ResolvedHeader]) -> Vec<&str> {
        headers.iter().map(|h| h.display.as_str()).collect()
    }

    #[test]
    fn test_nested_packages_are_labeled() {
        let tree = nested_packages();
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();
        let resolver = PathResolver::new(&tree, &index, &exts);

        let headers = resolver.resolve("", "subpackage").unwrap();
        assert_eq!(
            displays(&headers),
            vec![
                "//subpackage:subpackage_header.h",
                "//subpackage:subdirectory/subdirectory_header.h",
                "//subpackage/subsubpackage:subsubpackage_header.h",
                "//subpackage/subsubpackage:subdirectory/subdirectory_header.h",
                "//subpackage/subsubpackage/subsubsubpackage:subsubsubpackage_header.h",
                "//subpackage/subsubpackage/subsubsubpackage:subdirectory/subdirectory_header.h",
            ]
        );
        assert!(headers.iter().all(|h| h.cross_package));
    }

    #[test]
    fn test_same_package_headers_are_package_relative() {
        let tree = nested_packages();
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();
        let resolver = PathResolver::new(&tree, &index, &exts);

        let headers = resolver.resolve("subpackage", "subpackage/subdirectory").unwrap();
        assert_eq!(displays(&headers), vec!["subdirectory/subdirectory_header.h"]);
        assert!(!headers[0].cross_package);
    }

    #[test]
    fn test_package_groups_keep_first_encounter_order() {
        // `a/pkg` is a package reached between two plain directories of the
        // root package; the root group stays together and comes first.
        let tree = FileTree::from_files([
            "inc/top.h",
            "inc/a/pkg/Android.bp",
            "inc/a/pkg/p.h",
            "inc/a/x.h",
            "inc/b/y.h",
        ]);
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();
        let resolver = PathResolver::new(&tree, &index, &exts);

        let headers = resolver.resolve("", "inc").unwrap();
        assert_eq!(
            displays(&headers),
            vec!["inc/top.h", "inc/a/x.h", "inc/b/y.h", "//inc/a/pkg:p.h"]
        );
    }

    #[test]
    fn test_non_headers_are_skipped_and_empty_dir_is_ok() {
        let mut tree = FileTree::from_files(["src/a.c", "src/README", "src/.h"]);
        tree.add_dir("empty");
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();
        let resolver = PathResolver::new(&tree, &index, &exts);

        assert!(resolver.resolve("", "src").unwrap().is_empty());
        assert!(resolver.resolve("", "empty").unwrap().is_empty());
    }

    #[test]
    fn test_missing_dir_and_stale_file() {
        let mut tree = FileTree::from_files(["inc/a.h", "inc/b.h"]);
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();

        {
            let resolver = PathResolver::new(&tree, &index, &exts);
            assert_eq!(
                resolver.resolve("", "nope"),
                Err(MissingPath("nope".to_string()))
            );
            // A file is not an include directory
            assert!(resolver.resolve("", "inc/a.h").is_err());
        }

        tree.mark_missing("inc/b.h");
        let resolver = PathResolver::new(&tree, &index, &exts);
        assert_eq!(
            resolver.resolve("", "inc"),
            Err(MissingPath("inc/b.h".to_string()))
        );
    }

    #[test]
    fn test_package_headers_stop_at_subpackages() {
        let tree = FileTree::from_files([
            "pkg/a.h",
            "pkg/b.cc",
            "pkg/sub/c.h",
            "pkg/nested/Android.bp",
            "pkg/nested/d.h",
        ]);
        let index = PackageIndex::build(&tree, &["Android.bp"]);
        let exts = extensions();
        let resolver = PathResolver::new(&tree, &index, &exts);

        assert_eq!(resolver.package_headers("pkg").unwrap(), vec!["a.h", "sub/c.h"]);
        assert_eq!(resolver.package_headers("pkg/nested").unwrap(), vec!["d.h"]);
        assert!(resolver.package_headers("gone").is_err());
    }
}
