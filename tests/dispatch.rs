use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use demo_api::storage::MemoryObjectStore;
use demo_api::store::{Inserted, ItemRow, ItemStore, MediaRow, MediaStore, MemoryStore, NewMedia};
use demo_api::{handle, AppError, AppState, Event, UrlStrategy};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    state: AppState,
    db: Arc<MemoryStore>,
    objects: Arc<MemoryObjectStore>,
}

fn harness(urls: UrlStrategy) -> Harness {
    let db = Arc::new(MemoryStore::default());
    let objects = Arc::new(MemoryObjectStore::default());
    let state = AppState::with_stores(Some(db.clone()), Some(objects.clone()), urls);
    Harness { state, db, objects }
}

async fn call(state: &AppState, body: Value) -> (u16, Value) {
    let reply = handle(state, Event::from_body(body.to_string())).await;
    assert_eq!(reply.headers.get("Content-Type").map(String::as_str), Some("application/json"));
    assert_eq!(reply.headers.get("Access-Control-Allow-Origin").map(String::as_str), Some("*"));
    (reply.status_code, reply.json().unwrap())
}

#[tokio::test]
async fn create_echoes_the_new_item() {
    let h = harness(UrlStrategy::default());
    let (status, body) = call(&h.state, json!({ "action": "create", "name": "widget", "description": "a thing" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "widget");
    assert_eq!(body["description"], "a thing");
    assert!(!body["createdAt"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn created_ids_increase() {
    let h = harness(UrlStrategy::default());
    let mut last = 0;
    for i in 0..5 {
        let (_, body) = call(&h.state, json!({ "action": "create", "name": format!("item-{}", i) })).await;
        let id = body["id"].as_i64().unwrap();
        assert!(id > last);
        last = id;
    }
}

#[tokio::test]
async fn create_without_name_fails_at_insert() {
    let h = harness(UrlStrategy::default());
    let (status, body) = call(&h.state, json!({ "action": "create" })).await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("name"));
    assert_eq!(h.db.item_count(), 0);
}

#[tokio::test]
async fn list_caps_at_fifty_newest_first() {
    let h = harness(UrlStrategy::default());
    for i in 0..55 {
        call(&h.state, json!({ "action": "create", "name": format!("item-{}", i) })).await;
    }
    let (status, body) = call(&h.state, json!({ "action": "list" })).await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0]["name"], "item-54");
    let stamps: Vec<&str> = rows.iter().map(|r| r["createdAt"].as_str().unwrap()).collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn delete_item_reports_whether_a_row_went_away() {
    let h = harness(UrlStrategy::default());
    let (_, created) = call(&h.state, json!({ "action": "create", "name": "widget" })).await;

    let (status, body) = call(&h.state, json!({ "action": "delete", "id": 999 })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "deleted": false }));

    let (status, body) = call(&h.state, json!({ "action": "delete", "id": created["id"] })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "deleted": true }));
    assert_eq!(h.db.item_count(), 0);
}

#[tokio::test]
async fn upload_stores_exact_bytes_under_unique_keys() {
    let h = harness(UrlStrategy::default());
    let payload: Vec<u8> = (0..=255).collect();
    let data = STANDARD.encode(&payload);

    let (status, first) = call(
        &h.state,
        json!({ "action": "upload", "filename": "bytes.bin", "contentType": "application/x-test", "data": data }),
    )
    .await;
    assert_eq!(status, 200);
    let (_, second) = call(&h.state, json!({ "action": "upload", "filename": "bytes.bin", "data": data })).await;

    let key = first["s3Key"].as_str().unwrap();
    assert_ne!(key, second["s3Key"].as_str().unwrap());
    assert!(key.starts_with("media/") && key.ends_with("/bytes.bin"));
    assert_eq!(first["url"], format!("/{}", key));
    assert_eq!(first["sizeBytes"], 256);

    let stored = h.objects.get(key).unwrap();
    assert_eq!(stored.bytes, payload);
    assert_eq!(STANDARD.encode(&stored.bytes), data);
    assert_eq!(stored.content_type, "application/x-test");
    assert_eq!(h.objects.get(second["s3Key"].as_str().unwrap()).unwrap().content_type, "application/octet-stream");
}

#[tokio::test]
async fn upload_defaults_filename() {
    let h = harness(UrlStrategy::default());
    let (_, body) = call(&h.state, json!({ "action": "upload", "data": STANDARD.encode("hi") })).await;
    assert_eq!(body["filename"], "file");
    assert!(body["s3Key"].as_str().unwrap().ends_with("/file"));
}

#[tokio::test]
async fn upload_without_data_fails() {
    let h = harness(UrlStrategy::default());
    for body in [json!({ "action": "upload" }), json!({ "action": "upload", "data": "" })] {
        let (status, reply) = call(&h.state, body).await;
        assert_eq!(status, 500);
        assert_eq!(reply["error"], "No file data provided");
    }
    assert_eq!(h.objects.put_calls(), 0);
    assert!(h.objects.is_empty());
    assert_eq!(h.db.media_count(), 0);
}

#[tokio::test]
async fn upload_needs_storage() {
    let db = Arc::new(MemoryStore::default());
    let state = AppState::with_stores(Some(db), None, UrlStrategy::default());
    let (status, body) = call(&state, json!({ "action": "upload", "data": STANDARD.encode("hi") })).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Storage not configured");
}

#[tokio::test]
async fn list_media_presigns_every_row() {
    let h = harness(UrlStrategy::Presigned {
        expires_in: Duration::from_secs(86_400),
    });
    for name in ["a.txt", "b.txt", "c.txt"] {
        call(&h.state, json!({ "action": "upload", "filename": name, "data": STANDARD.encode(name) })).await;
    }
    let presigns_after_upload = h.objects.presign_calls();

    let (status, body) = call(&h.state, json!({ "action": "list-media" })).await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["filename"], "c.txt");
    assert_eq!(h.objects.presign_calls(), presigns_after_upload + 3);
    for row in rows {
        let key = row["s3Key"].as_str().unwrap();
        assert_eq!(row["url"], format!("memory://{}?expires=86400", key));
        assert_eq!(row["contentType"], "application/octet-stream");
    }
}

#[tokio::test]
async fn delete_media_removes_object_then_row() {
    let h = harness(UrlStrategy::default());
    let (_, uploaded) = call(&h.state, json!({ "action": "upload", "filename": "x", "data": STANDARD.encode("x") })).await;
    let key = uploaded["s3Key"].as_str().unwrap().to_string();

    let (status, body) = call(&h.state, json!({ "action": "delete-media", "id": uploaded["id"] })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "deleted": true }));
    assert!(h.objects.get(&key).is_none());
    assert_eq!(h.db.media_count(), 0);
}

#[tokio::test]
async fn delete_missing_media_skips_the_object_store() {
    let h = harness(UrlStrategy::default());
    let (status, body) = call(&h.state, json!({ "action": "delete-media", "id": 42 })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "deleted": false }));
    assert_eq!(h.objects.delete_calls(), 0);
}

#[tokio::test]
async fn delete_media_needs_storage() {
    let h = harness(UrlStrategy::default());
    let (_, uploaded) = call(&h.state, json!({ "action": "upload", "filename": "x", "data": STANDARD.encode("x") })).await;
    let without_storage = AppState::with_stores(Some(h.db.clone()), None, UrlStrategy::default());

    let (status, body) = call(&without_storage, json!({ "action": "delete-media", "id": uploaded["id"] })).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Storage not configured");
    assert_eq!(h.db.media_count(), 1);
    assert_eq!(h.objects.delete_calls(), 0);
}

/// Memory store whose media row deletes always fail.
#[derive(Default)]
struct RowDeleteFails(MemoryStore);

#[async_trait]
impl ItemStore for RowDeleteFails {
    async fn list_items(&self, limit: i64) -> Result<Vec<ItemRow>, AppError> {
        self.0.list_items(limit).await
    }

    async fn insert_item(&self, name: Option<&str>, description: &str) -> Result<Inserted, AppError> {
        self.0.insert_item(name, description).await
    }

    async fn delete_item(&self, id: Option<i32>) -> Result<bool, AppError> {
        self.0.delete_item(id).await
    }
}

#[async_trait]
impl MediaStore for RowDeleteFails {
    async fn list_media(&self, limit: i64) -> Result<Vec<MediaRow>, AppError> {
        self.0.list_media(limit).await
    }

    async fn insert_media(&self, media: NewMedia<'_>) -> Result<Inserted, AppError> {
        self.0.insert_media(media).await
    }

    async fn media_key(&self, id: Option<i32>) -> Result<Option<String>, AppError> {
        self.0.media_key(id).await
    }

    async fn delete_media(&self, _id: Option<i32>) -> Result<bool, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn failed_row_delete_leaves_the_object_deleted() {
    let db = Arc::new(RowDeleteFails::default());
    let objects = Arc::new(MemoryObjectStore::default());
    let state = AppState::with_stores(Some(db.clone()), Some(objects.clone()), UrlStrategy::default());
    let (_, uploaded) = call(&state, json!({ "action": "upload", "filename": "x", "data": STANDARD.encode("x") })).await;
    let key = uploaded["s3Key"].as_str().unwrap().to_string();
    assert!(objects.get(&key).is_some());

    let (status, body) = call(&state, json!({ "action": "delete-media", "id": uploaded["id"] })).await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().starts_with("database:"));
    assert_eq!(objects.delete_calls(), 1);
    assert!(objects.get(&key).is_none());
    assert_eq!(db.0.media_count(), 1);
}

#[tokio::test]
async fn without_database_status_degrades_and_actions_fail() {
    let state = AppState::with_stores(None, None, UrlStrategy::default());

    let (status, body) = call(&state, json!({ "action": "status" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], false);
    assert_eq!(body["storage"], false);
    assert!(!body["dbError"].as_str().unwrap().is_empty());

    for action in ["list", "create", "delete", "upload", "list-media", "delete-media"] {
        let (status, body) = call(&state, json!({ "action": action, "name": "x", "data": "eA==" })).await;
        assert_eq!(status, 500, "action {}", action);
        assert!(body["error"].as_str().unwrap().starts_with("Database not connected"));
    }
}

#[tokio::test]
async fn unknown_action_and_empty_body_are_status() {
    let h = harness(UrlStrategy::default());
    let (_, body) = call(&h.state, json!({ "action": "explode" })).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], true);
    assert_eq!(body["dbError"], "");

    let reply = handle(&h.state, Event::default()).await;
    assert_eq!(reply.status_code, 200);
    assert_eq!(reply.json().unwrap()["runtime"], "rust");
}

#[tokio::test]
async fn unparseable_body_is_a_500() {
    let h = harness(UrlStrategy::default());
    let reply = handle(&h.state, Event::from_body("{not json")).await;
    assert_eq!(reply.status_code, 500);
    assert!(reply.json().unwrap()["error"].is_string());
}

#[tokio::test]
async fn whitespace_body_is_a_500_not_status() {
    let h = harness(UrlStrategy::default());
    for body in ["   ", "\n"] {
        let reply = handle(&h.state, Event::from_body(body)).await;
        assert_eq!(reply.status_code, 500);
        assert!(reply.json().unwrap()["error"].as_str().unwrap().starts_with("invalid JSON"));
    }
    assert_eq!(handle(&h.state, Event::from_body("")).await.status_code, 200);
}
