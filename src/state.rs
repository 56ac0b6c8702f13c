//! Per-process context built once at cold start and handed to every invocation.

use crate::config::settings::DATABASE_URL;
use crate::config::Settings;
use crate::error::{AppError, ConfigError};
use crate::storage::{ObjectStore, S3ObjectStore, UrlStrategy};
use crate::store::{PgStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when the database is unconfigured or the startup connection failed.
    pub db: Option<Arc<dyn Store>>,
    /// `None` when no bucket is configured.
    pub objects: Option<Arc<dyn ObjectStore>>,
    pub urls: UrlStrategy,
    /// Why `db` is missing, or which settings fell back to defaults; surfaced by the
    /// status probe and "not connected" errors.
    pub startup_error: Option<String>,
}

impl AppState {
    /// Connect to whatever `settings` names. Never fails: a configuration or
    /// database problem is recorded in `startup_error` and the handler keeps serving.
    pub async fn init(settings: &Settings) -> Self {
        let (db, db_error) = match settings.database_url.as_deref() {
            None => (None, Some(ConfigError::Missing(DATABASE_URL).to_string())),
            Some(url) => match PgStore::connect(url).await {
                Ok(store) => (Some(Arc::new(store) as Arc<dyn Store>), None),
                Err(e) => {
                    tracing::error!(error = %e, "database initialization failed");
                    (None, Some(e.to_string()))
                }
            },
        };

        let objects = match settings.storage_bucket.as_deref() {
            Some(bucket) => {
                tracing::info!(%bucket, strategy = settings.url_strategy.name(), "object storage configured");
                Some(Arc::new(S3ObjectStore::from_env(bucket).await) as Arc<dyn ObjectStore>)
            }
            None => None,
        };

        let startup_error = match (settings.config_error.as_deref(), db_error) {
            (Some(config), Some(db_err)) => Some(format!("{}; {}", config, db_err)),
            (config, db_err) => db_err.or_else(|| config.map(String::from)),
        };

        AppState {
            db,
            objects,
            urls: settings.url_strategy.clone(),
            startup_error,
        }
    }

    /// Context over explicit stores; what tests and embedders use.
    pub fn with_stores(db: Option<Arc<dyn Store>>, objects: Option<Arc<dyn ObjectStore>>, urls: UrlStrategy) -> Self {
        let startup_error = db.is_none().then(|| "no database configured".to_string());
        AppState {
            db,
            objects,
            urls,
            startup_error,
        }
    }

    pub fn db(&self) -> Result<&dyn Store, AppError> {
        self.db
            .as_deref()
            .ok_or_else(|| AppError::NotConnected(self.startup_error.clone().unwrap_or_default()))
    }

    pub fn objects(&self) -> Result<&dyn ObjectStore, AppError> {
        self.objects.as_deref().ok_or(AppError::StorageNotConfigured)
    }
}
