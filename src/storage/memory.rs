//! In-process object store for tests. Only built with `cfg(test)` or the `test-util` feature.

use super::ObjectStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    presigns: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn presign_calls(&self) -> usize {
        self.presigns.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredObject>> {
        // A poisoned map is still a usable map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.lock().remove(key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        self.presigns.fetch_add(1, Ordering::SeqCst);
        Ok(format!("memory://{}?expires={}", key, expires_in.as_secs()))
    }
}
