//! File and folder records stored in the session tree.

use std::collections::BTreeMap;

use desktop_app_contract::ApplicationId;
use indexmap::IndexMap;
use platform_host::join_path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            read: true,
            write: true,
            execute: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Name,
    Date,
    Size,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderView {
    #[default]
    Grid,
    List,
    Details,
}

/// Fields shared by files and folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub id: ItemId,
    pub name: String,
    pub path: String,
    pub created_at_ms: u64,
    pub modified_at_ms: u64,
    pub accessed_at_ms: u64,
    pub permissions: Permissions,
    pub owner: String,
    pub hidden: bool,
    pub system: bool,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl ItemMetadata {
    pub fn new(id: ItemId, name: impl Into<String>, path: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            created_at_ms: now_ms,
            modified_at_ms: now_ms,
            accessed_at_ms: now_ms,
            permissions: Permissions::default(),
            owner: DEFAULT_OWNER.to_string(),
            hidden: false,
            system: false,
            tags: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

pub const DEFAULT_OWNER: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(flatten)]
    pub meta: ItemMetadata,
    pub extension: String,
    pub size: u64,
    pub mime_type: String,
    pub content: String,
    pub open_with: Option<ApplicationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    #[serde(flatten)]
    pub meta: ItemMetadata,
    /// Direct children keyed by id, in insertion order.
    pub children: IndexMap<ItemId, FileSystemItem>,
    pub expanded: bool,
    pub item_count: usize,
    pub total_size: u64,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub view: FolderView,
}

impl FolderRecord {
    pub fn new(id: ItemId, name: impl Into<String>, path: impl Into<String>, now_ms: u64) -> Self {
        Self {
            meta: ItemMetadata::new(id, name, path, now_ms),
            children: IndexMap::new(),
            expanded: false,
            item_count: 0,
            total_size: 0,
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            view: FolderView::default(),
        }
    }

    pub fn child_by_name(&self, name: &str) -> Option<&FileSystemItem> {
        self.children.values().find(|child| child.name() == name)
    }

    pub fn child_by_name_mut(&mut self, name: &str) -> Option<&mut FileSystemItem> {
        self.children.values_mut().find(|child| child.name() == name)
    }

    pub fn has_child_named(&self, name: &str) -> bool {
        self.child_by_name(name).is_some()
    }

    /// Recomputes the cached count and size from the direct children.
    pub fn recompute_aggregates(&mut self) {
        self.item_count = self.children.len();
        self.total_size = self.children.values().map(FileSystemItem::aggregate_size).sum();
    }

    pub fn insert_child(&mut self, item: FileSystemItem) {
        self.children.insert(item.id(), item);
    }

    /// Removes a child while keeping the remaining children in order.
    pub fn remove_child(&mut self, id: ItemId) -> Option<FileSystemItem> {
        self.children.shift_remove(&id)
    }

    /// Name that does not clash with any child, derived from `name` with a copy suffix.
    pub fn unique_child_name(&self, name: &str) -> String {
        if !self.has_child_named(name) {
            return name.to_string();
        }
        let (stem, extension) = split_extension(name);
        (1..)
            .map(|n| {
                let suffix = if n == 1 {
                    " (copy)".to_string()
                } else {
                    format!(" (copy {n})")
                };
                match extension {
                    Some(ext) => format!("{stem}{suffix}.{ext}"),
                    None => format!("{stem}{suffix}"),
                }
            })
            .find(|candidate| !self.has_child_named(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FileSystemItem {
    File(FileRecord),
    Folder(FolderRecord),
}

impl FileSystemItem {
    pub fn meta(&self) -> &ItemMetadata {
        match self {
            Self::File(file) => &file.meta,
            Self::Folder(folder) => &folder.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut ItemMetadata {
        match self {
            Self::File(file) => &mut file.meta,
            Self::Folder(folder) => &mut folder.meta,
        }
    }

    pub fn id(&self) -> ItemId {
        self.meta().id
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn path(&self) -> &str {
        &self.meta().path
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileRecord> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderRecord> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut FolderRecord> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    /// Size this item contributes to its parent: file size, or a folder's maintained total.
    pub fn aggregate_size(&self) -> u64 {
        match self {
            Self::File(file) => file.size,
            Self::Folder(folder) => folder.total_size,
        }
    }

    /// Extension used for type sorting; folders have none.
    pub fn extension(&self) -> &str {
        match self {
            Self::File(file) => &file.extension,
            Self::Folder(_) => "",
        }
    }

    /// Moves this item to `new_path`, rewriting the paths of every descendant.
    pub fn relocate(&mut self, new_path: String) {
        if let Self::Folder(folder) = self {
            for child in folder.children.values_mut() {
                let child_path = join_path(&new_path, child.name());
                child.relocate(child_path);
            }
        }
        self.meta_mut().path = new_path;
    }

    /// Ids of this item and every descendant.
    pub fn subtree_ids(&self) -> Vec<ItemId> {
        let mut ids = vec![self.id()];
        if let Self::Folder(folder) = self {
            for child in folder.children.values() {
                ids.extend(child.subtree_ids());
            }
        }
        ids
    }
}

/// Description of a file to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSpec {
    pub name: String,
    pub content: String,
    /// Explicit size in bytes; defaults to the byte length of `content`.
    pub size: Option<u64>,
    pub mime_type: Option<String>,
    pub open_with: Option<ApplicationId>,
    pub hidden: bool,
    pub tags: Vec<String>,
}

impl FileSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            size: None,
            mime_type: None,
            open_with: None,
            hidden: false,
            tags: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_open_with(mut self, application_id: ApplicationId) -> Self {
        self.open_with = Some(application_id);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Splits `name` into stem and lower-case extension. Dotfiles have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

pub fn extension_of(name: &str) -> String {
    split_extension(name)
        .1
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: u64, name: &str, path: &str, size: u64) -> FileSystemItem {
        FileSystemItem::File(FileRecord {
            meta: ItemMetadata::new(ItemId(id), name, path, 1),
            extension: extension_of(name),
            size,
            mime_type: mime_type_for_extension(&extension_of(name)).to_string(),
            content: String::new(),
            open_with: None,
        })
    }

    #[test]
    fn extension_handles_dotfiles_and_case() {
        assert_eq!(extension_of("Photo.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn unique_child_name_appends_copy_suffixes() {
        let mut folder = FolderRecord::new(ItemId(1), "docs", "/docs", 1);
        folder.insert_child(file(2, "a.txt", "/docs/a.txt", 1));
        assert_eq!(folder.unique_child_name("b.txt"), "b.txt");
        assert_eq!(folder.unique_child_name("a.txt"), "a (copy).txt");
        folder.insert_child(file(3, "a (copy).txt", "/docs/a (copy).txt", 1));
        assert_eq!(folder.unique_child_name("a.txt"), "a (copy 2).txt");
    }

    #[test]
    fn remove_child_preserves_insertion_order() {
        let mut folder = FolderRecord::new(ItemId(1), "docs", "/docs", 1);
        for (id, name) in [(2, "one"), (3, "two"), (4, "three")] {
            folder.insert_child(file(id, name, &format!("/docs/{name}"), 1));
        }
        folder.remove_child(ItemId(3));
        let names: Vec<&str> = folder.children.values().map(FileSystemItem::name).collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn relocate_rewrites_descendant_paths() {
        let mut inner = FolderRecord::new(ItemId(2), "inner", "/a/inner", 1);
        inner.insert_child(file(3, "x.txt", "/a/inner/x.txt", 4));
        let mut outer = FolderRecord::new(ItemId(1), "a", "/a", 1);
        outer.insert_child(FileSystemItem::Folder(inner));
        let mut item = FileSystemItem::Folder(outer);

        item.relocate("/b".to_string());

        let outer = item.as_folder().expect("folder");
        let inner = outer.child_by_name("inner").expect("inner");
        assert_eq!(inner.path(), "/b/inner");
        let leaf = inner
            .as_folder()
            .and_then(|folder| folder.child_by_name("x.txt"))
            .expect("leaf");
        assert_eq!(leaf.path(), "/b/inner/x.txt");
        assert_eq!(item.subtree_ids(), vec![ItemId(1), ItemId(2), ItemId(3)]);
    }
}
