//! Host-level helpers shared by the desktop session runtime.
//!
//! This crate owns the pieces of the session core that do not depend on window or file-system
//! state: `/`-delimited virtual path utilities, session timestamps, and the lightweight
//! preference store used to load settings at boot.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::path::{
    build_breadcrumbs, item_name, join_path, normalize_virtual_path, parent_path, path_segments,
    Breadcrumb, ROOT_BREADCRUMB_LABEL,
};
pub use storage::prefs::{
    read_pref, write_pref, MemoryPrefsStore, PrefsError, PrefsFuture, PrefsStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
