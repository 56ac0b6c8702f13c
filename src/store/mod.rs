//! Relational persistence for items and media metadata.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;

use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Newest-first listings never return more than this many rows.
pub const LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub id: i32,
    pub filename: String,
    pub s3_key: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewMedia<'a> {
    pub filename: &'a str,
    pub s3_key: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i32,
}

/// Generated columns returned by an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    pub id: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_items(&self, limit: i64) -> Result<Vec<ItemRow>, AppError>;

    /// `name` is passed through unchecked; `None` violates the NOT NULL column.
    async fn insert_item(&self, name: Option<&str>, description: &str) -> Result<Inserted, AppError>;

    /// True when a row was removed.
    async fn delete_item(&self, id: Option<i32>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn list_media(&self, limit: i64) -> Result<Vec<MediaRow>, AppError>;

    async fn insert_media(&self, media: NewMedia<'_>) -> Result<Inserted, AppError>;

    async fn media_key(&self, id: Option<i32>) -> Result<Option<String>, AppError>;

    async fn delete_media(&self, id: Option<i32>) -> Result<bool, AppError>;
}

/// Both tables behind one handle.
pub trait Store: ItemStore + MediaStore {}

impl<T: ItemStore + MediaStore> Store for T {}

/// Text form of a timestamp column, e.g. `2024-05-01 12:30:00.123456`.
pub fn timestamp_text(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.to_string()).unwrap_or_default()
}
