//! Search and ordering over file tree items.

use std::{borrow::Borrow, cmp::Ordering};

use serde::{Deserialize, Serialize};

use super::{
    item::{FileSystemItem, FolderRecord, SortKey, SortOrder},
    tree::FileSystemTree,
};

pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub include_hidden: bool,
    /// Lower-case extensions to keep; folders never match when a filter is set.
    pub extension_filter: Option<Vec<String>>,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            include_hidden: false,
            extension_filter: None,
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }
}

impl SearchOptions {
    fn name_matches(&self, name: &str, needle: &str) -> bool {
        if self.case_sensitive {
            name.contains(needle)
        } else {
            name.to_lowercase().contains(needle)
        }
    }

    fn extension_matches(&self, item: &FileSystemItem) -> bool {
        match (&self.extension_filter, item) {
            (None, _) => true,
            (Some(_), FileSystemItem::Folder(_)) => false,
            (Some(filter), FileSystemItem::File(file)) => filter
                .iter()
                .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(&file.extension)),
        }
    }
}

impl FileSystemTree {
    /// Depth-first name search from the root, stopping once `max_results` items matched.
    ///
    /// Hidden items are skipped together with their descendants unless `include_hidden` is set.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<&FileSystemItem> {
        let needle = if options.case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        let mut results = Vec::new();
        if options.max_results > 0 {
            search_folder(&self.root, &needle, options, &mut results);
        }
        results
    }
}

fn search_folder<'a>(
    folder: &'a FolderRecord,
    needle: &str,
    options: &SearchOptions,
    results: &mut Vec<&'a FileSystemItem>,
) -> bool {
    for child in folder.children.values() {
        if child.meta().hidden && !options.include_hidden {
            continue;
        }
        if options.name_matches(child.name(), needle) && options.extension_matches(child) {
            results.push(child);
            if results.len() >= options.max_results {
                return true;
            }
        }
        if let Some(sub) = child.as_folder() {
            if search_folder(sub, needle, options, results) {
                return true;
            }
        }
    }
    false
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Orders items in place. `Type` puts folders first, then groups files by extension; name
/// breaks every tie ascending regardless of `order`.
///
/// `Descending` reverses the whole primary key, so a descending `Type` sort lists files
/// (extensions reversed) before folders.
pub fn sort_items<T: Borrow<FileSystemItem>>(items: &mut [T], by: SortKey, order: SortOrder) {
    items.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        let primary = match by {
            SortKey::Name => compare_names(a.name(), b.name()),
            SortKey::Date => a.meta().modified_at_ms.cmp(&b.meta().modified_at_ms),
            SortKey::Size => a.aggregate_size().cmp(&b.aggregate_size()),
            SortKey::Type => b
                .is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.extension().cmp(b.extension())),
        };
        let primary = match order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| compare_names(a.name(), b.name()))
    });
}
