//! In-memory virtual file system backing the file browser, gallery, and document viewers.

mod item;
mod query;
mod seed;
mod tree;
mod validation;

pub use item::{
    extension_of, mime_type_for_extension, split_extension, FileRecord, FileSpec, FileSystemItem,
    FolderRecord, FolderView, ItemId, ItemMetadata, Permissions, SortKey, SortOrder,
    DEFAULT_OWNER,
};
pub use query::{sort_items, SearchOptions, DEFAULT_MAX_SEARCH_RESULTS};
pub use tree::{
    Clipboard, ClipboardOperation, FileSystemTree, PasteOutcome, VfsError, MAX_RECENT_ITEMS,
};
pub use validation::{validate_item_name, NameValidationError, MAX_NAME_LEN};
