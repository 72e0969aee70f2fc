//! SQLite-backed document store.
//!
//! Every document is one row of the `documents` table, keyed by
//! `(collection, id)`, with the fields kept as JSON text.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use super::{generate_id, merge_into, DocumentStore, Fields, Snapshot, StoreError};

/// Open (creating if needed) the database file and run migrations.
pub async fn init_db(path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!(path = %path.display(), "database ready");

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: String,
}

impl DocumentRow {
    fn into_snapshot(self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            id: self.id,
            data: serde_json::from_str(&self.data)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = generate_id();
        let data = Value::Object(fields.resolve(Utc::now())).to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await?;

        tracing::debug!(collection, %id, "sqlite create");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(DocumentRow::into_snapshot).transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, StoreError> {
        let rows: Vec<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(DocumentRow::into_snapshot).collect()
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (current,) = current.ok_or_else(|| StoreError::not_found(collection, id))?;
        let mut data: Map<String, Value> = serde_json::from_str(&current)?;
        merge_into(&mut data, fields.resolve(Utc::now()));

        sqlx::query("UPDATE documents SET data = ? WHERE collection = ? AND id = ?")
            .bind(Value::Object(data).to_string())
            .bind(collection)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(collection, id, "sqlite update");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(collection, id, "sqlite delete");
        Ok(())
    }
}
