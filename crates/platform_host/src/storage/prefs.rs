//! Preference documents that seed session configuration.
//!
//! A store keeps one JSON document per key. The session reads its settings document at boot and
//! writes the merged settings back after each change; nothing here outlives the page.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Boxed future returned by [`PrefsStore`] so the trait stays object-safe.
pub type PrefsFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PrefsError>> + 'a>>;

#[derive(Debug, Error)]
/// Why a preference document could not be read or written.
pub enum PrefsError {
    /// The backing store refused the operation.
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
    /// The document does not have the shape the caller asked for.
    #[error("preference `{key}` is malformed: {source}")]
    Malformed {
        /// Key of the offending document.
        key: String,
        /// Underlying (de)serialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value store of JSON preference documents.
pub trait PrefsStore {
    /// Reads the document stored under `key`.
    fn read_document<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Option<Value>>;

    /// Replaces the document stored under `key`.
    fn write_document<'a>(&'a self, key: &'a str, document: Value) -> PrefsFuture<'a, ()>;
}

#[derive(Debug, Clone, Default)]
/// Page-lifetime store. Clones share the same documents.
pub struct MemoryPrefsStore {
    documents: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl MemoryPrefsStore {
    /// Creates a store holding a single document.
    pub fn with_document(key: impl Into<String>, document: Value) -> Self {
        let store = Self::default();
        store.documents.borrow_mut().insert(key.into(), document);
        store
    }

    /// Returns a copy of the document under `key` without going through the async API.
    pub fn document(&self, key: &str) -> Option<Value> {
        self.documents.borrow().get(key).cloned()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn read_document<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Option<Value>> {
        Box::pin(async move { Ok(self.document(key)) })
    }

    fn write_document<'a>(&'a self, key: &'a str, document: Value) -> PrefsFuture<'a, ()> {
        Box::pin(async move {
            self.documents.borrow_mut().insert(key.to_string(), document);
            Ok(())
        })
    }
}

/// Reads the document under `key` as a `T`.
///
/// # Errors
///
/// Fails when the store fails or the document does not deserialize into `T`.
pub async fn read_pref<T, S>(store: &S, key: &str) -> Result<Option<T>, PrefsError>
where
    T: DeserializeOwned,
    S: PrefsStore + ?Sized,
{
    let Some(document) = store.read_document(key).await? else {
        return Ok(None);
    };
    serde_json::from_value(document)
        .map(Some)
        .map_err(|source| PrefsError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Serializes `value` and stores it under `key`.
///
/// # Errors
///
/// Fails when `value` cannot be represented as JSON or the store fails.
pub async fn write_pref<T, S>(store: &S, key: &str, value: &T) -> Result<(), PrefsError>
where
    T: Serialize + ?Sized,
    S: PrefsStore + ?Sized,
{
    let document = serde_json::to_value(value).map_err(|source| PrefsError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.write_document(key, document).await
}
