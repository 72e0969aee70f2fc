//! In-process document store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{generate_id, merge_into, DocumentStore, Fields, Snapshot, StoreError};

type Collection = BTreeMap<String, Map<String, Value>>;

/// Document store held entirely in memory.
///
/// Clones share the same underlying data. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = generate_id();
        let data = fields.resolve(Utc::now());
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        tracing::debug!(collection, %id, "memory create");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Snapshot {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Snapshot {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_into(existing, fields.resolve(Utc::now()));
        tracing::debug!(collection, id, "memory update");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        tracing::debug!(collection, id, "memory delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        let id = store
            .create("users", Fields::new().with("name", "Ana"))
            .await
            .unwrap();

        let snapshot = store.get("users", &id).await.unwrap().unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.data["name"], json!("Ana"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("users", "nope").await.unwrap().is_none());
        assert!(store.list("users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store
                .create("recipes", Fields::new().with("n", n))
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .list("recipes")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(store.count("recipes").await, 5);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .create("users", Fields::new().with("name", "Ana").with("email", "a@x.io"))
            .await
            .unwrap();

        store
            .update("users", &id, Fields::new().with("email", "ana@x.io"))
            .await
            .unwrap();

        let data = store.get("users", &id).await.unwrap().unwrap().data;
        assert_eq!(data["name"], json!("Ana"));
        assert_eq!(data["email"], json!("ana@x.io"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("users", "ghost", Fields::new().with("name", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.create("users", Fields::new()).await.unwrap();

        store.delete("users", &id).await.unwrap();
        store.delete("users", &id).await.unwrap();
        assert!(store.get("users", &id).await.unwrap().is_none());
    }
}
