//! Document store access.
//!
//! A document store keeps schemaless JSON objects ("documents") in named
//! collections. Each document is addressed by a string id the store generates
//! on create.
//!
//! # Timestamps
//!
//! A write may carry [`FieldValue::ServerTimestamp`] instead of a concrete
//! value. The store replaces every such field with its own clock reading,
//! stored as an RFC 3339 string in UTC. All sentinels in one write resolve to
//! the same instant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{init_db, SqliteStore};

/// Length of store-generated document ids.
pub const AUTO_ID_LEN: usize = 20;

/// Generate a random alphanumeric document id.
pub fn generate_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

/// A value to write into a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A concrete JSON value.
    Value(Value),
    /// Replaced by the store's current time when the write is applied.
    ServerTimestamp,
}

/// Ordered set of fields for a create or merge-update write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build fields from a value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::Value(value)))
                    .collect(),
            )),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Set a field, replacing an existing entry with the same name in place.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, FieldValue::Value(value.into()));
        self
    }

    pub fn with_server_timestamp(mut self, key: impl Into<String>) -> Self {
        self.insert(key, FieldValue::ServerTimestamp);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(existing, _)| existing == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Turn the fields into stored JSON, resolving timestamp sentinels to `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> Map<String, Value> {
        let stamp = now.to_rfc3339();
        self.0
            .into_iter()
            .map(|(key, value)| match value {
                FieldValue::Value(value) => (key, value),
                FieldValue::ServerTimestamp => (key, Value::String(stamp.clone())),
            })
            .collect()
    }
}

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub data: Map<String, Value>,
}

/// Errors raised by a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No document '{id}' in collection '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("Document fields must serialize to a JSON object")]
    NotAnObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(std::path::PathBuf, std::io::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Collection/document primitives the services are written against.
///
/// Implementations never retry; faults surface to the caller as-is.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write a new document and return its generated id.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Fetch one document. `Ok(None)` when no document has this id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Fetch every document in a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, StoreError>;

    /// Merge `fields` into an existing document. Fields not named are kept.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Shallow merge used by store implementations for `update`.
pub(crate) fn merge_into(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}
