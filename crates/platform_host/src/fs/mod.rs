//! Virtual file-system helpers that operate on path strings only.

pub mod path;
