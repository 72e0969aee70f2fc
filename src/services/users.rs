use std::sync::Arc;

use super::{decode, decode_all, ServiceError, RECYCLE, USERS};
use crate::models::{Identified, RecycleRecord, User, UserData, UserPatch};
use crate::store::{DocumentStore, Fields};

/// Users of the admin dashboard.
///
/// Deleting a user is a soft delete: a copy goes to the `recycle`
/// collection before the `users` document is removed.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new user as given and return it with its assigned id.
    pub async fn create_user(&self, user: UserData) -> Result<User, ServiceError> {
        let id = self
            .store
            .create(USERS, Fields::from_serialize(&user)?)
            .await?;
        tracing::info!(%id, "created user");
        Ok(User::new(id, user))
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, ServiceError> {
        decode_all(USERS, self.store.list(USERS).await?)
    }

    /// `Ok(None)` when no user has this id.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.store
            .get(USERS, id)
            .await?
            .map(|snapshot| decode(USERS, snapshot))
            .transpose()
    }

    /// Merge the set fields of `patch` into the user.
    ///
    /// The result echoes the id and the submitted fields only; it does not
    /// reflect fields the patch left untouched.
    pub async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
    ) -> Result<Identified<UserPatch>, ServiceError> {
        self.store
            .update(USERS, id, Fields::from_serialize(&patch)?)
            .await?;
        tracing::info!(id, "updated user");
        Ok(Identified::new(id, patch))
    }

    /// Move the user to the recycle collection, then remove it from `users`.
    pub async fn delete_user(&self, user: &User) -> Result<(), ServiceError> {
        let record = Fields::from_serialize(&user.data)?.with_server_timestamp("deleted_at");
        let recycled_id = self.store.create(RECYCLE, record).await?;
        self.store.delete(USERS, &user.id).await?;
        tracing::info!(id = %user.id, %recycled_id, "moved user to recycle bin");
        Ok(())
    }

    pub async fn get_recycled_users(
        &self,
    ) -> Result<Vec<Identified<RecycleRecord>>, ServiceError> {
        decode_all(RECYCLE, self.store.list(RECYCLE).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FailingStore;
    use crate::store::{MemoryStore, StoreError};
    use chrono::{DateTime, Utc};

    fn service() -> (UserService, MemoryStore) {
        let store = MemoryStore::new();
        (UserService::new(Arc::new(store.clone())), store)
    }

    fn ana() -> UserData {
        UserData::new("Ana Lima", "ana@example.com")
            .with_dob("1990-04-02")
            .with_gender("female")
            .with_picture("https://img.example.com/ana.png")
    }

    #[tokio::test]
    async fn test_create_then_get_returns_input_plus_id() {
        let (users, _) = service();
        let created = users.create_user(ana()).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.data, ana());

        let fetched = users.get_user_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_create_keeps_caller_timestamps() {
        let (users, _) = service();
        let at: DateTime<Utc> = "2024-06-01T08:30:00Z".parse().unwrap();
        let created = users
            .create_user(UserData::new("Bo", "bo@x.io").with_timestamps(at))
            .await
            .unwrap();

        let fetched = users.get_user_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.data.created_at, Some(at));
        assert_eq!(fetched.data.updated_at, Some(at));
    }

    #[tokio::test]
    async fn test_get_missing_user_is_none() {
        let (users, _) = service();
        assert!(users.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_users() {
        let (users, _) = service();
        users.create_user(ana()).await.unwrap();
        users
            .create_user(UserData::new("Bo", "bo@x.io"))
            .await
            .unwrap();

        let mut names: Vec<String> = users
            .get_all_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.data.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Ana Lima", "Bo"]);
    }

    #[tokio::test]
    async fn test_update_merges_and_echoes_patch() {
        let (users, _) = service();
        let created = users.create_user(ana()).await.unwrap();

        let patch = UserPatch {
            email: Some("ana.lima@example.com".into()),
            ..UserPatch::default()
        };
        let echoed = users.update_user(&created.id, patch.clone()).await.unwrap();
        assert_eq!(echoed, Identified::new(created.id.clone(), patch));

        let fetched = users.get_user_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.data.email, "ana.lima@example.com");
        assert_eq!(fetched.data.name, "Ana Lima");
        assert_eq!(fetched.data.dob, "1990-04-02");
    }

    #[tokio::test]
    async fn test_update_missing_user_propagates_not_found() {
        let (users, _) = service();
        let err = users
            .update_user("ghost", UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_moves_user_to_recycle() {
        let (users, store) = service();
        let created = users.create_user(ana()).await.unwrap();
        let before_count = store.count(RECYCLE).await;
        let called_at = Utc::now();

        users.delete_user(&created).await.unwrap();

        assert!(users.get_user_by_id(&created.id).await.unwrap().is_none());
        assert_eq!(store.count(RECYCLE).await, before_count + 1);

        let recycled = users.get_recycled_users().await.unwrap();
        assert_eq!(recycled.len(), 1);
        let record = &recycled[0].data;
        assert_eq!(record.user, ana());
        assert!(record.deleted_at >= called_at);
        assert_ne!(recycled[0].id, created.id);
    }

    #[tokio::test]
    async fn test_recycle_record_has_no_user_id() {
        let (users, store) = service();
        let created = users.create_user(ana()).await.unwrap();
        users.delete_user(&created).await.unwrap();

        let snapshot = store.list(RECYCLE).await.unwrap().remove(0);
        assert!(snapshot.data.get("id").is_none());
        assert!(snapshot.data.get("deleted_at").is_some());
    }

    #[tokio::test]
    async fn test_store_faults_propagate() {
        let users = UserService::new(Arc::new(FailingStore));
        assert!(matches!(
            users.get_all_users().await,
            Err(ServiceError::Store(StoreError::Io(..)))
        ));
        assert!(matches!(
            users.get_user_by_id("x").await,
            Err(ServiceError::Store(_))
        ));
        assert!(matches!(
            users.create_user(ana()).await,
            Err(ServiceError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_user_document_is_reported() {
        let (users, store) = service();
        let id = store
            .create(USERS, Fields::new().with("name", "No Email"))
            .await
            .unwrap();

        let err = users.get_user_by_id(&id).await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedDocument { .. }));
    }
}
