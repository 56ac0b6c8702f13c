//! In-process store mirroring the PostgreSQL tables, for tests. Only built with
//! `cfg(test)` or the `test-util` feature.

use super::{Inserted, ItemRow, ItemStore, MediaRow, MediaStore, NewMedia};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    items: Vec<ItemRow>,
    media: Vec<MediaRow>,
    next_item_id: i32,
    next_media_id: i32,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    pub fn media_count(&self) -> usize {
        self.lock().media.len()
    }
}

fn now() -> Option<NaiveDateTime> {
    Some(Utc::now().naive_utc())
}

/// `ORDER BY created_at DESC`, with the id breaking ties between same-instant rows.
fn newest_first<T: Clone>(rows: &[T], key: impl Fn(&T) -> (Option<NaiveDateTime>, i32), limit: i64) -> Vec<T> {
    let mut out = rows.to_vec();
    out.sort_by_key(|r| std::cmp::Reverse(key(r)));
    out.truncate(usize::try_from(limit).unwrap_or(0));
    out
}

fn not_null(column: &str) -> AppError {
    AppError::BadRequest(format!("null value in column \"{}\" violates not-null constraint", column))
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_items(&self, limit: i64) -> Result<Vec<ItemRow>, AppError> {
        Ok(newest_first(&self.lock().items, |r| (r.created_at, r.id), limit))
    }

    async fn insert_item(&self, name: Option<&str>, description: &str) -> Result<Inserted, AppError> {
        let name = name.ok_or_else(|| not_null("name"))?;
        let mut tables = self.lock();
        tables.next_item_id += 1;
        let row = ItemRow {
            id: tables.next_item_id,
            name: name.to_string(),
            description: Some(description.to_string()),
            created_at: now(),
        };
        let inserted = Inserted {
            id: row.id,
            created_at: row.created_at,
        };
        tables.items.push(row);
        Ok(inserted)
    }

    async fn delete_item(&self, id: Option<i32>) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.items.len();
        tables.items.retain(|r| Some(r.id) != id);
        Ok(tables.items.len() < before)
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn list_media(&self, limit: i64) -> Result<Vec<MediaRow>, AppError> {
        Ok(newest_first(&self.lock().media, |r| (r.created_at, r.id), limit))
    }

    async fn insert_media(&self, media: NewMedia<'_>) -> Result<Inserted, AppError> {
        let mut tables = self.lock();
        tables.next_media_id += 1;
        let row = MediaRow {
            id: tables.next_media_id,
            filename: media.filename.to_string(),
            s3_key: media.s3_key.to_string(),
            content_type: Some(media.content_type.to_string()),
            size_bytes: Some(media.size_bytes),
            created_at: now(),
        };
        let inserted = Inserted {
            id: row.id,
            created_at: row.created_at,
        };
        tables.media.push(row);
        Ok(inserted)
    }

    async fn media_key(&self, id: Option<i32>) -> Result<Option<String>, AppError> {
        Ok(self
            .lock()
            .media
            .iter()
            .find(|r| Some(r.id) == id)
            .map(|r| r.s3_key.clone()))
    }

    async fn delete_media(&self, id: Option<i32>) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.media.len();
        tables.media.retain(|r| Some(r.id) != id);
        Ok(tables.media.len() < before)
    }
}
