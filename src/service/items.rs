//! Item actions: list, create, delete.

use super::Deleted;
use crate::error::AppError;
use crate::handlers::ActionRequest;
use crate::state::AppState;
use crate::store::{timestamp_text, ItemRow, LIST_LIMIT};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

impl From<ItemRow> for ItemView {
    fn from(row: ItemRow) -> Self {
        ItemView {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            created_at: timestamp_text(row.created_at),
        }
    }
}

pub async fn list_items(state: &AppState) -> Result<Vec<ItemView>, AppError> {
    let db = state.db()?;
    let rows = db.list_items(LIST_LIMIT).await?;
    Ok(rows.into_iter().map(ItemView::from).collect())
}

pub async fn create_item(state: &AppState, req: &ActionRequest) -> Result<ItemView, AppError> {
    let db = state.db()?;
    let name = req.str_field("name")?;
    let description = req.str_or("description", "")?;
    let inserted = db.insert_item(name.as_deref(), &description).await?;
    tracing::info!(id = inserted.id, "item created");
    Ok(ItemView {
        id: inserted.id,
        name: name.unwrap_or_default(),
        description,
        created_at: timestamp_text(inserted.created_at),
    })
}

pub async fn delete_item(state: &AppState, req: &ActionRequest) -> Result<Deleted, AppError> {
    let db = state.db()?;
    let id = req.id_field()?;
    let deleted = db.delete_item(id).await?;
    tracing::info!(?id, deleted, "item delete");
    Ok(Deleted { deleted })
}
