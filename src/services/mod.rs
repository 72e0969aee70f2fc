//! Typed access to the document store.
//!
//! Services translate between raw store snapshots and the entity models. They
//! hold no cache: every read goes back to the store.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::store::{Snapshot, StoreError};

mod catalog;
mod users;

pub use catalog::CatalogService;
pub use users::UserService;

pub const USERS: &str = "users";
pub const RECYCLE: &str = "recycle";
pub const CATEGORIES: &str = "categories";
pub const RECIPES: &str = "recipes";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed document '{id}' in collection '{collection}': {source}")]
    MalformedDocument {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a snapshot into an entity. The store id is injected as `id`.
pub(crate) fn decode<T: DeserializeOwned>(
    collection: &str,
    snapshot: Snapshot,
) -> Result<T, ServiceError> {
    let Snapshot { id, mut data } = snapshot;
    data.insert("id".to_string(), Value::String(id.clone()));
    serde_json::from_value(Value::Object(data)).map_err(|source| {
        tracing::warn!(collection, %id, error = %source, "malformed document");
        ServiceError::MalformedDocument {
            collection: collection.to_string(),
            id,
            source,
        }
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    collection: &str,
    snapshots: Vec<Snapshot>,
) -> Result<Vec<T>, ServiceError> {
    snapshots
        .into_iter()
        .map(|snapshot| decode(collection, snapshot))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use crate::store::{DocumentStore, Fields, Snapshot, StoreError};

    /// Store whose every call fails, for checking fault propagation.
    pub struct FailingStore;

    fn offline() -> StoreError {
        StoreError::Io(
            "remote".into(),
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline"),
        )
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn create(&self, _c: &str, _f: Fields) -> Result<String, StoreError> {
            Err(offline())
        }
        async fn get(&self, _c: &str, _id: &str) -> Result<Option<Snapshot>, StoreError> {
            Err(offline())
        }
        async fn list(&self, _c: &str) -> Result<Vec<Snapshot>, StoreError> {
            Err(offline())
        }
        async fn update(&self, _c: &str, _id: &str, _f: Fields) -> Result<(), StoreError> {
            Err(offline())
        }
        async fn delete(&self, _c: &str, _id: &str) -> Result<(), StoreError> {
            Err(offline())
        }
    }
}
