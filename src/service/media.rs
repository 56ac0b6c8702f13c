//! Media actions: upload, list, delete. Payload bytes live in the object store,
//! metadata in the `media` table.

use super::Deleted;
use crate::error::AppError;
use crate::handlers::ActionRequest;
use crate::state::AppState;
use crate::storage::media_key;
use crate::store::{timestamp_text, NewMedia, LIST_LIMIT};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub const DEFAULT_FILENAME: &str = "file";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub id: i32,
    pub filename: String,
    pub s3_key: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i32>,
    pub created_at: String,
}

/// Base64 text to bytes. ASCII whitespace (line-wrapped encoders) is dropped first.
fn decode_payload(data: &str) -> Result<Vec<u8>, AppError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

pub async fn upload_media(state: &AppState, req: &ActionRequest) -> Result<MediaView, AppError> {
    let db = state.db()?;
    let objects = state.objects()?;

    let filename = req.str_or("filename", DEFAULT_FILENAME)?;
    let content_type = req.str_or("contentType", DEFAULT_CONTENT_TYPE)?;
    let data = req
        .str_field("data")?
        .filter(|d| !d.is_empty())
        .ok_or(AppError::MissingFileData)?;

    let bytes = decode_payload(&data)?;
    let size_bytes = i32::try_from(bytes.len())
        .map_err(|_| AppError::BadRequest(format!("payload of {} bytes is too large", bytes.len())))?;
    let key = media_key(&filename);

    objects.put(&key, bytes, &content_type).await?;
    let inserted = db
        .insert_media(NewMedia {
            filename: &filename,
            s3_key: &key,
            content_type: &content_type,
            size_bytes,
        })
        .await?;
    tracing::info!(id = inserted.id, %key, size_bytes, "media uploaded");

    let url = state.urls.url_for(Some(objects), &key).await?;
    Ok(MediaView {
        id: inserted.id,
        filename,
        s3_key: key,
        url,
        content_type: Some(content_type),
        size_bytes: Some(size_bytes),
        created_at: timestamp_text(inserted.created_at),
    })
}

/// Newest 50 rows. URLs are derived per row, one at a time.
pub async fn list_media(state: &AppState) -> Result<Vec<MediaView>, AppError> {
    let db = state.db()?;
    let rows = db.list_media(LIST_LIMIT).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let url = state.urls.url_for(state.objects.as_deref(), &row.s3_key).await?;
        out.push(MediaView {
            id: row.id,
            filename: row.filename,
            s3_key: row.s3_key,
            url,
            content_type: row.content_type,
            size_bytes: row.size_bytes,
            created_at: timestamp_text(row.created_at),
        });
    }
    Ok(out)
}

/// Object first, then the row. A failed row delete leaves the object gone.
pub async fn delete_media(state: &AppState, req: &ActionRequest) -> Result<Deleted, AppError> {
    let db = state.db()?;
    let objects = state.objects()?;
    let id = req.id_field()?;

    let Some(key) = db.media_key(id).await? else {
        tracing::info!(?id, "media not found");
        return Ok(Deleted { deleted: false });
    };
    objects.delete(&key).await?;
    db.delete_media(id).await?;
    tracing::info!(?id, %key, "media deleted");
    Ok(Deleted { deleted: true })
}
