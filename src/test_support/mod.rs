//! Test utilities for rulegen unit tests.
//!
//! Conversion runs on in-memory snapshots, so most tests need no real
//! filesystem at all: build a `FileTree` and a `ModuleGraph` from the
//! fixtures here and run the converter over them.
//!
//! # Example
//!
//! ```rust,ignore
//! use rulegen::test_support::{graph, workspace};
//!
//! #[test]
//! fn test_example() {
//!     let tree = workspace::nested_subpackages();
//!     let graph = graph::arch_and_os_deps();
//!     // Run the converter over them...
//! }
//! ```

pub mod fixtures;

use std::path::Path;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Write `files` below `root`, creating parent directories.
///
/// Every file gets empty contents; conversion only looks at paths.
pub fn write_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture directory");
        }
        std::fs::write(&path, "").expect("write fixture file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_written_files_scan_like_the_fixture() {
        let tmp = TempDir::new().unwrap();
        let fixture = workspace::nested_subpackages();
        let files: Vec<&str> = fixture
            .paths()
            .filter(|(_, e)| !e.is_dir)
            .map(|(p, _)| p)
            .collect();
        write_files(tmp.path(), &files);

        let scanned = crate::util::fs::scan_tree(tmp.path()).unwrap();
        assert_eq!(scanned, fixture);
    }
}
