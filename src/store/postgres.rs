//! PostgreSQL store: table DDL and the per-action statements.

use super::{Inserted, ItemRow, ItemStore, MediaRow, MediaStore, NewMedia};
use crate::config::DatabaseTarget;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const ITEMS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const MEDIA_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS media (
        id SERIAL PRIMARY KEY,
        filename VARCHAR(255) NOT NULL,
        s3_key VARCHAR(500) NOT NULL,
        content_type VARCHAR(100),
        size_bytes INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// One long-lived connection; every statement autocommits.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Parse `database_url`, connect, and create both tables if absent.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let target = DatabaseTarget::parse(database_url)?;
        tracing::info!(host = %target.host, port = target.port, database = %target.database, "connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect_with(target.connect_options())
            .await?;
        let store = PgStore::new(pool);
        store.ensure_tables().await?;
        Ok(store)
    }

    pub async fn ensure_tables(&self) -> Result<(), AppError> {
        for ddl in [ITEMS_DDL, MEDIA_DDL] {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn list_items(&self, limit: i64) -> Result<Vec<ItemRow>, AppError> {
        let sql = "SELECT id, name, description, created_at FROM items ORDER BY created_at DESC LIMIT $1";
        tracing::debug!(sql = %sql, limit, "query");
        let rows = sqlx::query_as::<_, (i32, String, Option<String>, Option<NaiveDateTime>)>(sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, description, created_at)| ItemRow {
                id,
                name,
                description,
                created_at,
            })
            .collect())
    }

    async fn insert_item(&self, name: Option<&str>, description: &str) -> Result<Inserted, AppError> {
        let sql = "INSERT INTO items (name, description) VALUES ($1, $2) RETURNING id, created_at";
        tracing::debug!(sql = %sql, "query");
        let (id, created_at): (i32, Option<NaiveDateTime>) = sqlx::query_as(sql)
            .bind(name)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(Inserted { id, created_at })
    }

    async fn delete_item(&self, id: Option<i32>) -> Result<bool, AppError> {
        let sql = "DELETE FROM items WHERE id = $1";
        tracing::debug!(sql = %sql, ?id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MediaStore for PgStore {
    async fn list_media(&self, limit: i64) -> Result<Vec<MediaRow>, AppError> {
        let sql = "SELECT id, filename, s3_key, content_type, size_bytes, created_at FROM media ORDER BY created_at DESC LIMIT $1";
        tracing::debug!(sql = %sql, limit, "query");
        let rows = sqlx::query_as::<_, (i32, String, String, Option<String>, Option<i32>, Option<NaiveDateTime>)>(sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, filename, s3_key, content_type, size_bytes, created_at)| MediaRow {
                id,
                filename,
                s3_key,
                content_type,
                size_bytes,
                created_at,
            })
            .collect())
    }

    async fn insert_media(&self, media: NewMedia<'_>) -> Result<Inserted, AppError> {
        let sql = "INSERT INTO media (filename, s3_key, content_type, size_bytes) VALUES ($1, $2, $3, $4) RETURNING id, created_at";
        tracing::debug!(sql = %sql, key = %media.s3_key, "query");
        let (id, created_at): (i32, Option<NaiveDateTime>) = sqlx::query_as(sql)
            .bind(media.filename)
            .bind(media.s3_key)
            .bind(media.content_type)
            .bind(media.size_bytes)
            .fetch_one(&self.pool)
            .await?;
        Ok(Inserted { id, created_at })
    }

    async fn media_key(&self, id: Option<i32>) -> Result<Option<String>, AppError> {
        let sql = "SELECT s3_key FROM media WHERE id = $1";
        tracing::debug!(sql = %sql, ?id, "query");
        let row: Option<(String,)> = sqlx::query_as(sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(key,)| key))
    }

    async fn delete_media(&self, id: Option<i32>) -> Result<bool, AppError> {
        let sql = "DELETE FROM media WHERE id = $1";
        tracing::debug!(sql = %sql, ?id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
