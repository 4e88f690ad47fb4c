use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    QueryBuilder, Row,
};
use std::str::FromStr;
use std::time::Duration;

use crate::core::{Collection, DocumentId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::document::{matches_all, Document, Fields, Filter, FilterOp};
use crate::infrastructure::traits::DocumentStore;

/// SQLite implementation of the document store.
/// Every collection shares one table; field bags are stored as JSON text.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if missing) the database at `url`, e.g. `sqlite:crm.db`
    pub async fn connect(url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid database URL {}: {}", url, e)))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to {}: {}", url, e)))?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        // A single long-lived connection: each SQLite in-memory connection is
        // its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// Create the documents table and its index
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                time_created INTEGER NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, time_created)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents index: {}", e)))?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn encode_fields(fields: &Fields) -> AppResult<String> {
    Ok(serde_json::to_string(fields)?)
}

fn decode_fields(id: &str, raw: &str) -> AppResult<Fields> {
    match serde_json::from_str(raw)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::SerializationError(format!(
            "Document {} does not hold an object",
            id
        ))),
    }
}

#[async_trait]
impl DocumentStore for SqliteDatabase {
    async fn insert(&self, collection: Collection, fields: Fields) -> AppResult<DocumentId> {
        let id = DocumentId::generate();
        self.put(collection, &id, fields).await?;
        Ok(id)
    }

    async fn put(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()> {
        let now = chrono::Utc::now().timestamp_millis();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, time_created) VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(encode_fields(&fields)?)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to write document {}/{}: {}", collection, id, e))
        })?;
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &DocumentId) -> AppResult<Option<Document>> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to get document {}/{}: {}", collection, id, e))
            })?;

        match row {
            Some(row) => {
                let raw: String = row.get("data");
                Ok(Some(Document::new(id.clone(), decode_fields(id.as_str(), &raw)?)))
            }
            None => Ok(None),
        }
    }

    async fn query(&self, collection: Collection, filters: &[Filter]) -> AppResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, data FROM documents WHERE collection = ");
        qb.push_bind(collection.as_str());

        // String equality is pushed down; every predicate is re-checked below
        for filter in filters {
            if let (FilterOp::Eq, Value::String(value)) = (filter.op, &filter.value) {
                qb.push(" AND json_extract(data, ");
                qb.push_bind(format!("$.{}", filter.field));
                qb.push(") = ");
                qb.push_bind(value.clone());
            }
        }
        qb.push(" ORDER BY time_created, rowid");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to query {}: {}", collection, e)))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let raw: String = row.get("data");
            let fields = decode_fields(&id, &raw)?;
            if matches_all(filters, &fields) {
                documents.push(Document::new(DocumentId::new(id), fields));
            }
        }
        Ok(documents)
    }

    async fn update(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to get document {}/{}: {}", collection, id, e))
            })?
            .ok_or_else(|| AppError::NotFound(format!("Document {}/{} not found", collection, id)))?;

        let raw: String = row.get("data");
        let mut merged = decode_fields(id.as_str(), &raw)?;
        merged.extend(fields);

        sqlx::query("UPDATE documents SET data = ? WHERE collection = ? AND id = ?")
            .bind(encode_fields(&merged)?)
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to update document {}/{}: {}", collection, id, e))
            })?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))
    }
}
