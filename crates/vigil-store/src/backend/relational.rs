//! Relational backend — sqlx over SQLite.
//!
//! Generic collections live in a single `records` table keyed by
//! (collection, id) with the field map stored as JSON text. This backend
//! has no live push; consumers re-fetch via the facade's refresh.

use serde_json::{Map, Value};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;
use uuid::Uuid;
use vigil_core::record::Record;

use crate::error::{StoreError, relational};
use crate::source::CollectionBackend;

/// Shared pool size for the whole process.
const MAX_CONNECTIONS: u32 = 10;

const RECORDS_DDL: &str = "\
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    fields TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, id)
);
CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);
";

#[derive(Clone)]
pub struct RelationalBackend {
    pool: SqlitePool,
}

impl RelationalBackend {
    /// Connect with the process-wide bounded pool and run the migration.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await
            .map_err(relational)?;
        let backend = Self { pool };
        backend.migrate().await?;
        Ok(backend)
    }

    /// Wrap an existing pool (tests hand in `sqlite::memory:` pools).
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let backend = Self { pool };
        backend.migrate().await?;
        Ok(backend)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        debug!("running relational records migration");
        sqlx::query(RECORDS_DDL)
            .execute(&self.pool)
            .await
            .map_err(relational)?;
        Ok(())
    }
}

impl CollectionBackend for RelationalBackend {
    async fn fetch(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let rows = sqlx::query("SELECT id, fields FROM records WHERE collection = ? ORDER BY rowid")
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .map_err(relational)?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.get("id");
                let raw: String = row.get("fields");
                let fields: Map<String, Value> =
                    serde_json::from_str(&raw).map_err(|e| StoreError::MalformedRecord {
                        collection: collection.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Record::new(id, fields))
            })
            .collect()
    }

    async fn save(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let raw = serde_json::to_string(&fields).map_err(|e| StoreError::MalformedRecord {
            collection: collection.to_string(),
            message: e.to_string(),
        })?;

        // Last-write-wins upsert, no optimistic concurrency check.
        sqlx::query(
            "INSERT INTO records (collection, id, fields) VALUES (?, ?, ?) \
             ON CONFLICT(collection, id) DO UPDATE SET \
             fields = excluded.fields, updated_at = datetime('now')",
        )
        .bind(collection)
        .bind(&id)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .map_err(relational)?;

        Ok(Record::new(id, fields))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(relational)?;
        Ok(())
    }
}
