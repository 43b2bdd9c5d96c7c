//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::core::FileTree;

/// Snapshot the workspace below `root`.
///
/// Hidden files and directories (names starting with `.`) are skipped,
/// which keeps VCS metadata and the project config directory out of the
/// snapshot. Symlinks are not followed.
pub fn scan_tree(root: &Path) -> Result<FileTree> {
    let mut tree = FileTree::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to scan workspace: {}", root.display()))?;
        if entry.depth() == 0 {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("path outside workspace: {}", entry.path().display()))?;
        let Some(rel) = rel.to_str() else {
            tracing::warn!("skipping non UTF-8 path: {}", entry.path().display());
            continue;
        };
        let rel = rel.replace('\\', "/");

        if entry.file_type().is_dir() {
            tree.add_dir(&rel);
        } else {
            tree.add_file(&rel);
        }
    }

    tracing::debug!("scanned {} paths below {}", tree.len(), root.display());
    Ok(tree)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("lib/include")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join("Android.bp"), "").unwrap();
        fs::write(root.join("lib/Android.bp"), "").unwrap();
        fs::write(root.join("lib/include/lib.h"), "").unwrap();
        fs::write(root.join(".hidden.h"), "").unwrap();
        fs::write(root.join(".git/HEAD"), "").unwrap();

        let tree = scan_tree(root).unwrap();
        assert!(tree.is_file("Android.bp"));
        assert!(tree.is_file("lib/include/lib.h"));
        assert!(tree.is_dir("lib/include"));
        assert!(tree.is_dir("empty"));
        assert!(tree.get(".hidden.h").is_none());
        assert!(tree.get(".git").is_none());
        assert!(tree.get(".git/HEAD").is_none());
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/BUILD.bazel");

        write_string(&path, "cc_library_static()\n").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "cc_library_static()\n");
    }
}
