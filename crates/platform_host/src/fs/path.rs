//! Virtual-path helpers for the session file tree.
//!
//! Paths are `/`-delimited strings rooted at `/`. Every helper here is a pure string function;
//! none of them consult the tree itself.

use serde::{Deserialize, Serialize};

/// Label used for the single breadcrumb that represents `/`.
pub const ROOT_BREADCRUMB_LABEL: &str = "Root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One navigable segment of a breadcrumb trail.
pub struct Breadcrumb {
    /// Display label for the segment.
    pub name: String,
    /// Absolute path the segment navigates to.
    pub path: String,
}

/// Normalizes a virtual file system path.
///
/// This helper trims whitespace, converts backslashes to `/`, resolves `.`/`..`, ensures a
/// leading slash, and returns `/` for empty or fully-collapsed paths.
pub fn normalize_virtual_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            if let Some(idx) = out.rfind('/') {
                out.truncate(idx);
            }
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

/// Returns the non-empty segments of `path` after normalization.
pub fn path_segments(path: &str) -> Vec<String> {
    normalize_virtual_path(path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the parent of `path`; the parent of `/` is `/`.
pub fn parent_path(path: &str) -> String {
    let normalized = normalize_virtual_path(path);
    match normalized.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
    }
}

/// Returns the last segment of `path`, or an empty string for `/`.
pub fn item_name(path: &str) -> String {
    let normalized = normalize_virtual_path(path);
    normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Appends `name` to `parent` without doubling the root separator.
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = normalize_virtual_path(parent);
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Builds the breadcrumb trail for `path`, always starting with the root crumb.
pub fn build_breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        name: ROOT_BREADCRUMB_LABEL.to_string(),
        path: "/".to_string(),
    }];
    let mut current = String::new();
    for segment in path_segments(path) {
        current.push('/');
        current.push_str(&segment);
        crumbs.push(Breadcrumb {
            name: segment,
            path: current.clone(),
        });
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_virtual_path_matches_expected_cases() {
        let cases = [
            ("", "/"),
            ("   ", "/"),
            ("foo/bar", "/foo/bar"),
            ("/foo//bar/", "/foo/bar"),
            ("./foo/../bar", "/bar"),
            ("\\\\foo\\\\bar", "/foo/bar"),
            ("/../../", "/"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_virtual_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn parent_and_name_split_the_last_segment() {
        assert_eq!(parent_path("/Projects/demo/demo.txt"), "/Projects/demo");
        assert_eq!(parent_path("/Projects"), "/");
        assert_eq!(parent_path("/"), "/");
        assert_eq!(item_name("/Projects/demo/demo.txt"), "demo.txt");
        assert_eq!(item_name("/"), "");
    }

    #[test]
    fn join_path_handles_root_parent() {
        assert_eq!(join_path("/", "Documents"), "/Documents");
        assert_eq!(join_path("/Documents", "a.txt"), "/Documents/a.txt");
        assert_eq!(
            join_path(&parent_path("/Documents/a.txt"), "b.txt"),
            "/Documents/b.txt"
        );
    }

    #[test]
    fn root_breadcrumbs_collapse_to_single_root_entry() {
        assert_eq!(
            build_breadcrumbs("/"),
            vec![Breadcrumb {
                name: "Root".to_string(),
                path: "/".to_string(),
            }]
        );
    }

    #[test]
    fn nested_breadcrumbs_accumulate_paths() {
        let crumbs = build_breadcrumbs("/Projects/demo");
        let paths: Vec<&str> = crumbs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/Projects", "/Projects/demo"]);
        assert_eq!(crumbs[2].name, "demo");
    }
}
