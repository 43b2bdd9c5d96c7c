//! File-tree snapshot.
//!
//! The converter never touches the live filesystem. It works on a
//! `FileTree` captured up front, so that every lookup and every directory
//! walk sees the same, fully materialized view.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::core::path;

/// A single entry in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub is_dir: bool,
    /// False for entries the snapshot knows about but which are gone
    /// (e.g. a stale listing). Walking into one is an error.
    pub exists: bool,
}

/// Direct children of a directory, split by kind and sorted by path.
#[derive(Debug, Default)]
pub struct Children<'a> {
    pub files: Vec<(&'a str, Entry)>,
    pub dirs: Vec<(&'a str, Entry)>,
}

/// Snapshot of a workspace file tree keyed by normalized relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
    entries: BTreeMap<String, Entry>,
}

impl FileTree {
    /// Create an empty snapshot containing only the workspace root.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            String::new(),
            Entry {
                is_dir: true,
                exists: true,
            },
        );
        FileTree { entries }
    }

    /// Build a snapshot from a list of file paths; parents become directories.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = FileTree::new();
        for file in files {
            tree.add_file(file.as_ref());
        }
        tree
    }

    /// Add a file and all of its parent directories.
    pub fn add_file(&mut self, file: &str) {
        let file = path::normalize(file);
        if let Some(parent) = path::parent(&file) {
            self.add_dir(parent);
        }
        self.entries.insert(
            file,
            Entry {
                is_dir: false,
                exists: true,
            },
        );
    }

    /// Add a directory and all of its parents.
    pub fn add_dir(&mut self, dir: &str) {
        let dir = path::normalize(dir);
        for ancestor in path::ancestors(&dir) {
            self.entries.entry(ancestor.to_string()).or_insert(Entry {
                is_dir: true,
                exists: true,
            });
        }
    }

    /// Record that a known path no longer exists.
    pub fn mark_missing(&mut self, p: &str) {
        if let Some(entry) = self.entries.get_mut(&path::normalize(p)) {
            entry.exists = false;
        }
    }

    /// Look up a normalized path.
    pub fn get(&self, p: &str) -> Option<Entry> {
        self.entries.get(p).copied()
    }

    /// True if `p` is a directory present in the snapshot.
    pub fn is_dir(&self, p: &str) -> bool {
        matches!(self.get(p), Some(Entry { is_dir: true, exists: true }))
    }

    /// True if `p` is a file present in the snapshot.
    pub fn is_file(&self, p: &str) -> bool {
        matches!(self.get(p), Some(Entry { is_dir: false, exists: true }))
    }

    /// Direct children of `dir`, files and directories each in path order.
    pub fn children(&self, dir: &str) -> Children<'_> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut children = Children::default();
        let range = self
            .entries
            .range::<str, _>((Bound::Excluded(dir), Bound::Unbounded));
        for (key, entry) in range {
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                // Keys sharing the prefix are contiguous, but siblings such as
                // `dir.h` or `dir-x` sort between `dir` and `dir/`.
                if key.as_str() > prefix.as_str() && !prefix.is_empty() {
                    break;
                }
                continue;
            };
            if rest.is_empty() || rest.contains('/') {
                continue;
            }
            if entry.is_dir {
                children.dirs.push((key.as_str(), *entry));
            } else {
                children.files.push((key.as_str(), *entry));
            }
        }
        children
    }

    /// All paths in the snapshot, in order.
    pub fn paths(&self) -> impl Iterator<Item = (&str, Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}
