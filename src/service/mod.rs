//! Action implementations over the stores in `AppState`.

pub mod items;
pub mod media;

use serde::Serialize;

pub use items::{create_item, delete_item, list_items, ItemView};
pub use media::{delete_media, list_media, upload_media, MediaView};

/// Result of either delete action. A missing row is `false`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}
