//! PostgreSQL document store
//!
//! All collections share the `documents` table; bodies live in a JSONB
//! column and filters use `data ->> field`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use super::{DocumentData, DocumentStore, FieldFilter, StoreError, StoreResult, StoredDocument};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

fn parse_id(collection: &str, id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::DocumentNotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    })
}

fn into_stored(rows: Vec<(Uuid, Json<DocumentData>)>) -> Vec<StoredDocument> {
    rows.into_iter()
        .map(|(id, Json(data))| StoredDocument {
            id: id.to_string(),
            data,
        })
        .collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, (Uuid, Json<DocumentData>)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_stored(rows))
    }

    async fn find_many(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, (Uuid, Json<DocumentData>)>(
            r#"
            SELECT id, data FROM documents
            WHERE collection = $1 AND data ->> $2::text = $3
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .bind(&filter.field)
        .bind(&filter.value)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_stored(rows))
    }

    async fn insert(&self, collection: &str, data: DocumentData) -> StoreResult<String> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, data, created_at) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(collection)
            .bind(Json(data))
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(id.to_string())
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()> {
        let uuid = parse_id(collection, id)?;
        let result = sqlx::query(
            r#"
            UPDATE documents SET data = data || $3, updated_at = $4
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(uuid)
        .bind(Json(patch))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        // A malformed id cannot exist in the table
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(());
        };
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable("connection pool is closed".to_string()));
        }
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
