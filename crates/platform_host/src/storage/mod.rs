//! Preference document storage.

pub mod prefs;
