//! Path-addressed operations over the session file tree.
//!
//! Every mutation keeps two invariants: an item's path is its parent's path joined with its
//! name, and every folder on the touched ancestor chain has `item_count`/`total_size` equal to
//! the sum over its direct children.

use std::collections::BTreeSet;

use platform_host::{
    item_name, join_path, next_monotonic_timestamp_ms, normalize_virtual_path, parent_path,
    path_segments,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    item::{
        extension_of, mime_type_for_extension, FileRecord, FileSpec, FileSystemItem, FolderRecord,
        FolderView, ItemId, ItemMetadata, SortKey, SortOrder,
    },
    validation::{validate_item_name, NameValidationError},
};

/// Most recent items remembered by the tree.
pub const MAX_RECENT_ITEMS: usize = 20;

const ROOT_ITEM_ID: ItemId = ItemId(0);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VfsError {
    #[error("no item at `{0}`")]
    PathNotFound(String),
    #[error("no item with id {0}")]
    ItemNotFound(ItemId),
    #[error("`{0}` is not a folder")]
    NotAFolder(String),
    #[error("an item named `{0}` already exists there")]
    NameConflict(String),
    #[error(transparent)]
    InvalidName(#[from] NameValidationError),
    #[error("cannot move `{0}` into itself")]
    InvalidMove(String),
    #[error("the root folder cannot be renamed, moved, or deleted")]
    RootImmutable,
    #[error("clipboard is empty")]
    EmptyClipboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipboardOperation {
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    /// Snapshot of the items at copy time; their paths locate the sources for a cut.
    pub items: Vec<FileSystemItem>,
    pub operation: ClipboardOperation,
}

/// What a paste produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteOutcome {
    /// Ids of the items now in the target folder.
    pub pasted: Vec<ItemId>,
    /// `(old, new)` paths of items a cut relocated.
    pub moved: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSystemTree {
    pub root: FolderRecord,
    pub current_path: String,
    pub selection: BTreeSet<ItemId>,
    pub clipboard: Option<Clipboard>,
    pub recent: Vec<String>,
    pub bookmarks: Vec<String>,
    pub trash: Vec<FileSystemItem>,
    next_item_id: u64,
}

impl Default for FileSystemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemTree {
    /// Creates a tree holding only an empty, expanded root folder.
    pub fn new() -> Self {
        let mut root = FolderRecord::new(ROOT_ITEM_ID, "", "/", next_monotonic_timestamp_ms());
        root.expanded = true;
        root.meta.system = true;
        Self {
            root,
            current_path: "/".to_string(),
            selection: BTreeSet::new(),
            clipboard: None,
            recent: Vec::new(),
            bookmarks: Vec::new(),
            trash: Vec::new(),
            next_item_id: ROOT_ITEM_ID.0 + 1,
        }
    }

    /// Folder at `path`; `/` resolves to the root.
    pub fn folder(&self, path: &str) -> Option<&FolderRecord> {
        let mut folder = &self.root;
        for segment in path_segments(path) {
            folder = folder.child_by_name(&segment)?.as_folder()?;
        }
        Some(folder)
    }

    fn folder_mut(&mut self, path: &str) -> Option<&mut FolderRecord> {
        let mut folder = &mut self.root;
        for segment in path_segments(path) {
            folder = folder.child_by_name_mut(&segment)?.as_folder_mut()?;
        }
        Some(folder)
    }

    /// Item at `path`. The root is not an item and resolves to `None`.
    pub fn item(&self, path: &str) -> Option<&FileSystemItem> {
        let name = item_name(path);
        if name.is_empty() {
            return None;
        }
        self.folder(&parent_path(path))?.child_by_name(&name)
    }

    fn item_mut(&mut self, path: &str) -> Option<&mut FileSystemItem> {
        let name = item_name(path);
        if name.is_empty() {
            return None;
        }
        self.folder_mut(&parent_path(path))?
            .child_by_name_mut(&name)
    }

    pub fn find_by_id(&self, id: ItemId) -> Option<&FileSystemItem> {
        fn walk(folder: &FolderRecord, id: ItemId) -> Option<&FileSystemItem> {
            if let Some(item) = folder.children.get(&id) {
                return Some(item);
            }
            folder
                .children
                .values()
                .filter_map(FileSystemItem::as_folder)
                .find_map(|child| walk(child, id))
        }
        walk(&self.root, id)
    }

    pub fn contains_id(&self, id: ItemId) -> bool {
        id == ROOT_ITEM_ID || self.find_by_id(id).is_some()
    }

    /// Children of the folder at `path`, ordered by that folder's sort preferences.
    pub fn sorted_children(&self, path: &str) -> Option<Vec<&FileSystemItem>> {
        let folder = self.folder(path)?;
        let mut children: Vec<&FileSystemItem> = folder.children.values().collect();
        super::query::sort_items(&mut children, folder.sort_by, folder.sort_order);
        Some(children)
    }

    fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        id
    }

    fn require_folder(&self, path: &str) -> Result<&FolderRecord, VfsError> {
        match self.folder(path) {
            Some(folder) => Ok(folder),
            None if self.item(path).is_some() => Err(VfsError::NotAFolder(path.to_string())),
            None => Err(VfsError::PathNotFound(path.to_string())),
        }
    }

    fn refresh_aggregates(&mut self, folder_path: &str) {
        fn refresh_chain(folder: &mut FolderRecord, segments: &[String]) {
            if let Some((head, rest)) = segments.split_first() {
                if let Some(child) = folder
                    .child_by_name_mut(head)
                    .and_then(FileSystemItem::as_folder_mut)
                {
                    refresh_chain(child, rest);
                }
            }
            folder.recompute_aggregates();
        }
        let segments = path_segments(folder_path);
        refresh_chain(&mut self.root, &segments);
    }

    /// Inserts a fully built item under `parent` and refreshes aggregates.
    fn attach(&mut self, parent: &str, item: FileSystemItem, now_ms: u64) -> Result<(), VfsError> {
        let folder = self
            .folder_mut(parent)
            .ok_or_else(|| VfsError::PathNotFound(parent.to_string()))?;
        folder.insert_child(item);
        folder.meta.modified_at_ms = now_ms;
        self.refresh_aggregates(parent);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on an invalid name, a missing or non-folder parent, or a sibling with the same name.
    pub fn create_file(&mut self, parent: &str, spec: FileSpec) -> Result<ItemId, VfsError> {
        validate_item_name(&spec.name)?;
        let parent = normalize_virtual_path(parent);
        if self.require_folder(&parent)?.has_child_named(&spec.name) {
            return Err(VfsError::NameConflict(spec.name));
        }

        let id = self.next_id();
        let now = next_monotonic_timestamp_ms();
        let extension = extension_of(&spec.name);
        let mime_type = spec
            .mime_type
            .unwrap_or_else(|| mime_type_for_extension(&extension).to_string());
        let size = spec.size.unwrap_or(spec.content.len() as u64);
        let path = join_path(&parent, &spec.name);
        let mut meta = ItemMetadata::new(id, spec.name, path, now);
        meta.hidden = spec.hidden;
        meta.tags = spec.tags;

        let file = FileSystemItem::File(FileRecord {
            meta,
            extension,
            size,
            mime_type,
            content: spec.content,
            open_with: spec.open_with,
        });
        self.attach(&parent, file, now)?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Fails on an invalid name, a missing or non-folder parent, or a sibling with the same name.
    pub fn create_folder(&mut self, parent: &str, name: &str) -> Result<ItemId, VfsError> {
        validate_item_name(name)?;
        let parent = normalize_virtual_path(parent);
        if self.require_folder(&parent)?.has_child_named(name) {
            return Err(VfsError::NameConflict(name.to_string()));
        }

        let id = self.next_id();
        let now = next_monotonic_timestamp_ms();
        let folder = FolderRecord::new(id, name, join_path(&parent, name), now);
        self.attach(&parent, FileSystemItem::Folder(folder), now)?;
        Ok(id)
    }

    /// Removes the item at `path` into the trash and returns the ids of everything removed.
    ///
    /// # Errors
    ///
    /// Fails for `/` or an unresolvable path.
    pub fn delete(&mut self, path: &str) -> Result<Vec<ItemId>, VfsError> {
        let path = normalize_virtual_path(path);
        if path == "/" {
            return Err(VfsError::RootImmutable);
        }
        let parent = parent_path(&path);
        let name = item_name(&path);
        let now = next_monotonic_timestamp_ms();

        let folder = self
            .folder_mut(&parent)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        let id = folder
            .child_by_name(&name)
            .map(FileSystemItem::id)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        let removed = folder
            .remove_child(id)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        folder.meta.modified_at_ms = now;
        self.refresh_aggregates(&parent);

        let removed_ids = removed.subtree_ids();
        for id in &removed_ids {
            self.selection.remove(id);
        }
        let inside = |candidate: &String| is_same_or_descendant(candidate, &path);
        self.recent.retain(|p| !inside(p));
        self.bookmarks.retain(|p| !inside(p));
        if inside(&self.current_path) {
            self.current_path = parent;
        }
        self.trash.push(removed);
        Ok(removed_ids)
    }

    /// Renames the item at `path` and rewrites the paths of all its descendants.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, a sibling with the new name, `/`, or an unresolvable path.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<String, VfsError> {
        validate_item_name(new_name)?;
        let path = normalize_virtual_path(path);
        if path == "/" {
            return Err(VfsError::RootImmutable);
        }
        let parent = parent_path(&path);
        let old_name = item_name(&path);
        if old_name == new_name {
            return if self.item(&path).is_some() {
                Ok(path)
            } else {
                Err(VfsError::PathNotFound(path))
            };
        }
        if self.require_folder(&parent)?.has_child_named(new_name) {
            return Err(VfsError::NameConflict(new_name.to_string()));
        }

        let new_path = join_path(&parent, new_name);
        let now = next_monotonic_timestamp_ms();
        let item = self
            .item_mut(&path)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        item.meta_mut().name = new_name.to_string();
        item.meta_mut().modified_at_ms = now;
        if let FileSystemItem::File(file) = item {
            file.extension = extension_of(new_name);
            file.mime_type = mime_type_for_extension(&file.extension).to_string();
        }
        item.relocate(new_path.clone());
        self.rewrite_path_references(&path, &new_path);
        Ok(new_path)
    }

    /// Moves the item at `source` into the folder at `target`.
    ///
    /// # Errors
    ///
    /// Fails when either side does not resolve, when a folder would move into itself, or when
    /// the target already holds an item with the same name.
    pub fn move_item(&mut self, source: &str, target: &str) -> Result<String, VfsError> {
        let source = normalize_virtual_path(source);
        let target = normalize_virtual_path(target);
        if source == "/" {
            return Err(VfsError::RootImmutable);
        }
        if is_same_or_descendant(&target, &source) {
            return Err(VfsError::InvalidMove(source));
        }
        let name = item_name(&source);
        let source_parent = parent_path(&source);
        let target_folder = self.require_folder(&target)?;
        if source_parent == target {
            return if target_folder.has_child_named(&name) {
                Ok(source)
            } else {
                Err(VfsError::PathNotFound(source))
            };
        }
        if target_folder.has_child_named(&name) {
            return Err(VfsError::NameConflict(name));
        }

        let now = next_monotonic_timestamp_ms();
        let folder = self
            .folder_mut(&source_parent)
            .ok_or_else(|| VfsError::PathNotFound(source.clone()))?;
        let id = folder
            .child_by_name(&name)
            .map(FileSystemItem::id)
            .ok_or_else(|| VfsError::PathNotFound(source.clone()))?;
        let mut item = folder
            .remove_child(id)
            .ok_or_else(|| VfsError::PathNotFound(source.clone()))?;
        folder.meta.modified_at_ms = now;
        self.refresh_aggregates(&source_parent);

        let new_path = join_path(&target, &name);
        item.relocate(new_path.clone());
        self.attach(&target, item, now)?;
        self.rewrite_path_references(&source, &new_path);
        Ok(new_path)
    }

    /// Single-select replaces the selection; multi-select toggles membership.
    ///
    /// # Errors
    ///
    /// Fails when no item has `id`.
    pub fn select(&mut self, id: ItemId, multi_select: bool) -> Result<(), VfsError> {
        if !self.contains_id(id) {
            return Err(VfsError::ItemNotFound(id));
        }
        if multi_select {
            if !self.selection.remove(&id) {
                self.selection.insert(id);
            }
        } else {
            self.selection.clear();
            self.selection.insert(id);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// # Errors
    ///
    /// Fails unless `path` resolves to a folder.
    pub fn navigate(&mut self, path: &str) -> Result<(), VfsError> {
        let path = normalize_virtual_path(path);
        self.require_folder(&path)?;
        self.current_path = path;
        self.selection.clear();
        Ok(())
    }

    /// # Errors
    ///
    /// Fails unless `path` resolves to a folder.
    pub fn toggle_folder_expansion(&mut self, path: &str) -> Result<bool, VfsError> {
        let path = normalize_virtual_path(path);
        self.require_folder(&path)?;
        let folder = self
            .folder_mut(&path)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        folder.expanded = !folder.expanded;
        Ok(folder.expanded)
    }

    /// # Errors
    ///
    /// Fails unless `path` resolves to a folder.
    pub fn set_folder_view(
        &mut self,
        path: &str,
        view: FolderView,
        sort_by: SortKey,
        sort_order: SortOrder,
    ) -> Result<(), VfsError> {
        let path = normalize_virtual_path(path);
        self.require_folder(&path)?;
        let folder = self
            .folder_mut(&path)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        folder.view = view;
        folder.sort_by = sort_by;
        folder.sort_order = sort_order;
        Ok(())
    }

    /// Snapshots the items at `paths`; unresolvable paths are skipped.
    ///
    /// # Errors
    ///
    /// Fails when none of the paths resolve.
    pub fn copy_to_clipboard(
        &mut self,
        paths: &[String],
        operation: ClipboardOperation,
    ) -> Result<usize, VfsError> {
        let items: Vec<FileSystemItem> = paths
            .iter()
            .filter_map(|path| self.item(path).cloned())
            .collect();
        if items.is_empty() {
            return Err(VfsError::PathNotFound(paths.join(", ")));
        }
        let count = items.len();
        self.clipboard = Some(Clipboard { items, operation });
        Ok(count)
    }

    /// Pastes the clipboard into `target` and clears it.
    ///
    /// A copy inserts fresh duplicates (new ids and timestamps, conflicting names get a copy
    /// suffix). A cut moves each source that still exists; sources that vanished are skipped.
    ///
    /// # Errors
    ///
    /// Fails when the clipboard is empty or `target` is not a folder.
    pub fn paste_from_clipboard(&mut self, target: &str) -> Result<PasteOutcome, VfsError> {
        let target = normalize_virtual_path(target);
        let clipboard = self.clipboard.clone().ok_or(VfsError::EmptyClipboard)?;
        self.require_folder(&target)?;

        let now = next_monotonic_timestamp_ms();
        let mut outcome = PasteOutcome::default();
        match clipboard.operation {
            ClipboardOperation::Copy => {
                for item in &clipboard.items {
                    let name = self.require_folder(&target)?.unique_child_name(item.name());
                    let mut copy = item.clone();
                    self.restamp(&mut copy, now);
                    copy.meta_mut().name = name.clone();
                    copy.relocate(join_path(&target, &name));
                    outcome.pasted.push(copy.id());
                    self.attach(&target, copy, now)?;
                }
            }
            ClipboardOperation::Cut => {
                for item in &clipboard.items {
                    let Ok(new_path) = self.move_item(item.path(), &target) else {
                        continue;
                    };
                    if let Some(moved) = self.item(&new_path) {
                        outcome.pasted.push(moved.id());
                    }
                    outcome.moved.push((item.path().to_string(), new_path));
                }
            }
        }
        self.clipboard = None;
        Ok(outcome)
    }

    fn restamp(&mut self, item: &mut FileSystemItem, now_ms: u64) {
        let id = self.next_id();
        let meta = item.meta_mut();
        meta.id = id;
        meta.created_at_ms = now_ms;
        meta.modified_at_ms = now_ms;
        meta.accessed_at_ms = now_ms;
        if let FileSystemItem::Folder(folder) = item {
            let children: Vec<FileSystemItem> =
                folder.children.drain(..).map(|(_, child)| child).collect();
            for mut child in children {
                self.restamp(&mut child, now_ms);
                folder.insert_child(child);
            }
        }
    }

    /// Marks the file at `path` as accessed and records it in the recent list.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not resolve to an item.
    pub fn touch(&mut self, path: &str) -> Result<&FileSystemItem, VfsError> {
        let path = normalize_virtual_path(path);
        let now = next_monotonic_timestamp_ms();
        let item = self
            .item_mut(&path)
            .ok_or_else(|| VfsError::PathNotFound(path.clone()))?;
        item.meta_mut().accessed_at_ms = now;
        self.recent.retain(|p| p != &path);
        self.recent.insert(0, path.clone());
        self.recent.truncate(MAX_RECENT_ITEMS);
        self.item(&path).ok_or(VfsError::PathNotFound(path))
    }

    /// # Errors
    ///
    /// Fails unless `path` resolves to a folder.
    pub fn add_bookmark(&mut self, path: &str) -> Result<(), VfsError> {
        let path = normalize_virtual_path(path);
        self.require_folder(&path)?;
        if !self.bookmarks.contains(&path) {
            self.bookmarks.push(path);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails when `path` is not bookmarked.
    pub fn remove_bookmark(&mut self, path: &str) -> Result<(), VfsError> {
        let path = normalize_virtual_path(path);
        let before = self.bookmarks.len();
        self.bookmarks.retain(|p| p != &path);
        if self.bookmarks.len() == before {
            return Err(VfsError::PathNotFound(path));
        }
        Ok(())
    }

    /// Drops everything in the trash and returns how many top-level items were discarded.
    pub fn empty_trash(&mut self) -> usize {
        let count = self.trash.len();
        self.trash.clear();
        count
    }

    fn rewrite_path_references(&mut self, old: &str, new: &str) {
        let rewrite = |path: &mut String| {
            if let Some(rest) = path.strip_prefix(old) {
                if rest.is_empty() || rest.starts_with('/') {
                    *path = format!("{new}{rest}");
                }
            }
        };
        rewrite(&mut self.current_path);
        self.recent.iter_mut().for_each(rewrite);
        self.bookmarks.iter_mut().for_each(rewrite);
    }
}

fn is_same_or_descendant(candidate: &str, ancestor: &str) -> bool {
    candidate == ancestor
        || candidate
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder_invariant_holds(folder: &FolderRecord) -> bool {
        let sum: u64 = folder
            .children
            .values()
            .map(FileSystemItem::aggregate_size)
            .sum();
        folder.item_count == folder.children.len()
            && folder.total_size == sum
            && folder.children.values().all(|child| {
                child.path() == join_path(&folder.meta.path, child.name())
                    && child.as_folder().map_or(true, folder_invariant_holds)
            })
    }

    fn tree_with_project() -> FileSystemTree {
        let mut tree = FileSystemTree::new();
        tree.create_folder("/", "Projects").expect("projects");
        tree.create_folder("/Projects", "demo").expect("demo");
        tree
    }

    #[test]
    fn create_under_nested_folder_sets_path_and_counts() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects/demo", FileSpec::new("demo.txt").with_size(10))
            .expect("file");

        let demo = tree.folder("/Projects/demo").expect("demo");
        assert_eq!(demo.item_count, 1);
        assert_eq!(
            tree.item("/Projects/demo/demo.txt").map(FileSystemItem::path),
            Some("/Projects/demo/demo.txt")
        );
        assert_eq!(tree.folder("/Projects").expect("projects").total_size, 10);
        assert_eq!(tree.root.total_size, 10);
        assert!(folder_invariant_holds(&tree.root));
    }

    #[test]
    fn create_into_missing_or_file_parent_fails() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects", FileSpec::new("a.txt")).expect("file");
        assert_eq!(
            tree.create_folder("/Nope", "x"),
            Err(VfsError::PathNotFound("/Nope".to_string()))
        );
        assert_eq!(
            tree.create_folder("/Projects/a.txt", "x"),
            Err(VfsError::NotAFolder("/Projects/a.txt".to_string()))
        );
    }

    #[test]
    fn duplicate_and_invalid_names_are_rejected() {
        let mut tree = tree_with_project();
        assert_eq!(
            tree.create_folder("/Projects", "demo"),
            Err(VfsError::NameConflict("demo".to_string()))
        );
        assert_eq!(
            tree.create_file("/Projects", FileSpec::new("bad|name")),
            Err(VfsError::InvalidName(NameValidationError::ForbiddenCharacter('|')))
        );
    }

    #[test]
    fn delete_updates_aggregates_selection_and_trash() {
        let mut tree = FileSystemTree::new();
        tree.create_folder("/", "docs").expect("docs");
        for (name, size) in [("a.bin", 1024), ("b.bin", 1024), ("c.bin", 1024)] {
            tree.create_file("/docs", FileSpec::new(name).with_size(size))
                .expect("file");
        }
        let b = tree.item("/docs/b.bin").map(FileSystemItem::id).expect("b");
        tree.select(b, false).expect("select");

        let removed = tree.delete("/docs/b.bin").expect("delete");

        let docs = tree.folder("/docs").expect("docs");
        assert_eq!(removed, vec![b]);
        assert_eq!(docs.item_count, 2);
        assert_eq!(docs.total_size, 2048);
        assert!(tree.selection.is_empty());
        assert_eq!(tree.trash.len(), 1);
        assert!(folder_invariant_holds(&tree.root));
    }

    #[test]
    fn delete_of_current_folder_moves_view_to_parent() {
        let mut tree = tree_with_project();
        tree.navigate("/Projects/demo").expect("navigate");
        tree.delete("/Projects").expect("delete");
        assert_eq!(tree.current_path, "/");
        assert_eq!(tree.delete("/"), Err(VfsError::RootImmutable));
    }

    #[test]
    fn rename_cascades_into_descendants_and_references() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects/demo", FileSpec::new("demo.txt"))
            .expect("file");
        tree.add_bookmark("/Projects/demo").expect("bookmark");
        tree.navigate("/Projects/demo").expect("navigate");

        let new_path = tree.rename("/Projects", "Work").expect("rename");

        assert_eq!(new_path, "/Work");
        assert!(tree.item("/Work/demo/demo.txt").is_some());
        assert_eq!(tree.bookmarks, vec!["/Work/demo".to_string()]);
        assert_eq!(tree.current_path, "/Work/demo");
        assert!(folder_invariant_holds(&tree.root));
    }

    #[test]
    fn rename_path_is_parent_plus_new_name() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects/demo", FileSpec::new("a.txt"))
            .expect("file");
        let renamed = tree.rename("/Projects/demo/a.txt", "b.md").expect("rename");
        assert_eq!(renamed, "/Projects/demo/b.md");
        let file = tree
            .item(&renamed)
            .and_then(FileSystemItem::as_file)
            .expect("file");
        assert_eq!(file.extension, "md");
        assert_eq!(file.mime_type, "text/markdown");
    }

    #[test]
    fn move_relocates_and_refreshes_both_chains() {
        let mut tree = tree_with_project();
        tree.create_folder("/", "Archive").expect("archive");
        tree.create_file("/Projects/demo", FileSpec::new("big.bin").with_size(500))
            .expect("file");

        let new_path = tree.move_item("/Projects/demo", "/Archive").expect("move");

        assert_eq!(new_path, "/Archive/demo");
        assert!(tree.item("/Archive/demo/big.bin").is_some());
        assert_eq!(tree.folder("/Projects").expect("projects").total_size, 0);
        assert_eq!(tree.folder("/Archive").expect("archive").total_size, 500);
        assert!(folder_invariant_holds(&tree.root));
    }

    #[test]
    fn move_into_own_subtree_is_rejected() {
        let mut tree = tree_with_project();
        assert_eq!(
            tree.move_item("/Projects", "/Projects/demo"),
            Err(VfsError::InvalidMove("/Projects".to_string()))
        );
    }

    #[test]
    fn selection_single_replaces_and_multi_toggles() {
        let mut tree = tree_with_project();
        let projects = tree.item("/Projects").map(FileSystemItem::id).expect("id");
        let demo = tree.item("/Projects/demo").map(FileSystemItem::id).expect("id");

        tree.select(projects, false).expect("select");
        tree.select(demo, true).expect("add");
        assert_eq!(tree.selection.len(), 2);
        tree.select(demo, true).expect("toggle off");
        assert_eq!(tree.selection.iter().copied().collect::<Vec<_>>(), vec![projects]);
        tree.select(demo, false).expect("replace");
        assert_eq!(tree.selection.iter().copied().collect::<Vec<_>>(), vec![demo]);
        assert_eq!(tree.select(ItemId(999), false), Err(VfsError::ItemNotFound(ItemId(999))));
    }

    #[test]
    fn navigate_requires_existing_folder_and_clears_selection() {
        let mut tree = tree_with_project();
        let demo = tree.item("/Projects/demo").map(FileSystemItem::id).expect("id");
        tree.select(demo, false).expect("select");
        assert!(tree.navigate("/Missing").is_err());
        assert_eq!(tree.current_path, "/");
        tree.navigate("/Projects/demo/").expect("navigate");
        assert_eq!(tree.current_path, "/Projects/demo");
        assert!(tree.selection.is_empty());
    }

    #[test]
    fn toggle_expansion_flips_flag() {
        let mut tree = tree_with_project();
        assert_eq!(tree.toggle_folder_expansion("/Projects"), Ok(true));
        assert_eq!(tree.toggle_folder_expansion("/Projects"), Ok(false));
    }

    #[test]
    fn copy_paste_duplicates_with_fresh_ids_and_clears_clipboard() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects/demo", FileSpec::new("a.txt").with_content("hello"))
            .expect("file");
        let original = tree.item("/Projects/demo").map(FileSystemItem::id).expect("id");

        tree.copy_to_clipboard(&["/Projects/demo".to_string()], ClipboardOperation::Copy)
            .expect("copy");
        let PasteOutcome { pasted, moved } =
            tree.paste_from_clipboard("/Projects").expect("paste");

        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], original);
        let copy = tree.item("/Projects/demo (copy)").expect("copy");
        assert_eq!(copy.id(), pasted[0]);
        let inner = tree.item("/Projects/demo (copy)/a.txt").expect("inner copy");
        assert_ne!(Some(inner.id()), tree.item("/Projects/demo/a.txt").map(FileSystemItem::id));
        assert!(moved.is_empty());
        assert!(tree.clipboard.is_none());
        assert_eq!(tree.folder("/Projects").expect("projects").total_size, 10);
        assert!(folder_invariant_holds(&tree.root));
    }

    #[test]
    fn cut_paste_moves_sources() {
        let mut tree = tree_with_project();
        tree.create_folder("/", "Archive").expect("archive");
        let demo = tree.item("/Projects/demo").map(FileSystemItem::id).expect("id");

        tree.copy_to_clipboard(&["/Projects/demo".to_string()], ClipboardOperation::Cut)
            .expect("cut");
        let outcome = tree.paste_from_clipboard("/Archive").expect("paste");

        assert_eq!(outcome.pasted, vec![demo]);
        assert_eq!(
            outcome.moved,
            vec![("/Projects/demo".to_string(), "/Archive/demo".to_string())]
        );
        assert!(tree.item("/Projects/demo").is_none());
        assert!(tree.item("/Archive/demo").is_some());
        assert!(tree.clipboard.is_none());
    }

    #[test]
    fn touch_records_recent_items_most_recent_first() {
        let mut tree = tree_with_project();
        tree.create_file("/Projects", FileSpec::new("a.txt")).expect("a");
        tree.create_file("/Projects", FileSpec::new("b.txt")).expect("b");
        tree.touch("/Projects/a.txt").expect("touch a");
        tree.touch("/Projects/b.txt").expect("touch b");
        tree.touch("/Projects/a.txt").expect("touch a again");
        assert_eq!(
            tree.recent,
            vec!["/Projects/a.txt".to_string(), "/Projects/b.txt".to_string()]
        );
    }

    #[test]
    fn names_that_lookups_cannot_reach_are_refused() {
        let mut tree = FileSystemTree::new();
        assert_eq!(
            tree.create_folder("/", "notes "),
            Err(VfsError::InvalidName(NameValidationError::SurroundingWhitespace))
        );
        tree.create_file("/", FileSpec::new("a.txt")).expect("file");
        assert_eq!(
            tree.rename("/a.txt", "a.txt."),
            Err(VfsError::InvalidName(NameValidationError::TrailingDot))
        );
        assert_eq!(tree.root.item_count, 1);
        assert!(tree.item("/a.txt").is_some());
    }
}
