//! Workspace-relative path helpers.
//!
//! Every path the converter handles is relative to the workspace root,
//! uses `/` as separator and is kept in normalized form: no `.` segments,
//! no trailing slash, and the root itself is the empty string. Keeping paths
//! as plain strings makes their ordering byte-wise and platform independent.

/// Normalize a workspace-relative path.
///
/// Drops `.` and empty segments and folds `..` into its parent. A `..` that
/// would escape the workspace root is kept so that the caller's lookup fails
/// instead of silently aliasing another directory.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Join a relative path onto a base directory and normalize the result.
pub fn join(base: &str, rel: &str) -> String {
    if base.is_empty() {
        normalize(rel)
    } else {
        normalize(&format!("{}/{}", base, rel))
    }
}

/// Parent directory of a normalized path. The root has no parent.
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    })
}

/// Final segment of a normalized path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Path of `path` relative to the directory `dir`, if it lies inside it.
///
/// `dir` itself maps to the empty string.
pub fn strip_dir<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(dir)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Iterate over `path` and all of its ancestors, ending with the root.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(path), |p| parent(p))
}

/// Display form of a directory for compiler flags: the root is `.`.
pub fn display_dir(dir: &str) -> &str {
    if dir.is_empty() {
        "."
    } else {
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./exported"), "exported");
        assert_eq!(normalize("a//b/"), "a/b");
        assert_eq!(normalize("a/./b/../c"), "a/c");
        assert_eq!(normalize("."), "");
        assert_eq!(normalize("../outside"), "../outside");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "include"), "include");
        assert_eq!(join("subpackage", "./exported"), "subpackage/exported");
        assert_eq!(join("a/b", ".."), "a");
    }

    #[test]
    fn test_parent_and_ancestors() {
        assert_eq!(parent("a/b/c.h"), Some("a/b"));
        assert_eq!(parent("c.h"), Some(""));
        assert_eq!(parent(""), None);

        let all: Vec<_> = ancestors("a/b/c").collect();
        assert_eq!(all, vec!["a/b/c", "a/b", "a", ""]);
    }

    #[test]
    fn test_strip_dir() {
        assert_eq!(strip_dir("a/b/c.h", "a"), Some("b/c.h"));
        assert_eq!(strip_dir("a/b/c.h", ""), Some("a/b/c.h"));
        assert_eq!(strip_dir("ab/c.h", "a"), None);
        assert_eq!(strip_dir("a", "a"), Some(""));
    }
}
