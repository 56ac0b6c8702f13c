//! Settings read once at cold start from the process environment.

use crate::error::ConfigError;
use crate::storage::UrlStrategy;
use std::time::Duration;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const STORAGE_BUCKET: &str = "STORAGE_BUCKET";
pub const MEDIA_URL_STRATEGY: &str = "MEDIA_URL_STRATEGY";
pub const MEDIA_URL_BASE: &str = "MEDIA_URL_BASE";
pub const MEDIA_URL_TTL_SECS: &str = "MEDIA_URL_TTL_SECS";

/// Presigned links stay valid for a day unless configured otherwise.
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct Settings {
    /// Absent disables every database operation.
    pub database_url: Option<String>,
    /// Absent disables every storage operation.
    pub storage_bucket: Option<String>,
    pub url_strategy: UrlStrategy,
    /// Set when the URL settings were unusable and the path strategy was used instead.
    pub config_error: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any name -> value lookup. Empty values count as unset.
    /// Never fails: a bad URL strategy or TTL is recorded in `config_error`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (url_strategy, config_error) = match url_strategy(&get) {
            Ok(strategy) => (strategy, None),
            Err(e) => {
                tracing::error!(error = %e, "falling back to path URLs");
                let fallback = UrlStrategy::Path {
                    base: get(MEDIA_URL_BASE).unwrap_or_default(),
                };
                (fallback, Some(e.to_string()))
            }
        };

        Settings {
            database_url: get(DATABASE_URL),
            storage_bucket: get(STORAGE_BUCKET),
            url_strategy,
            config_error,
        }
    }
}

fn url_strategy(get: &dyn Fn(&str) -> Option<String>) -> Result<UrlStrategy, ConfigError> {
    match get(MEDIA_URL_STRATEGY).as_deref() {
        None | Some("path") => Ok(UrlStrategy::Path {
            base: get(MEDIA_URL_BASE).unwrap_or_default(),
        }),
        Some("presigned") => {
            let expires_in = match get(MEDIA_URL_TTL_SECS) {
                Some(raw) => {
                    let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                        name: MEDIA_URL_TTL_SECS,
                        reason: format!("expected seconds, got '{}'", raw),
                    })?;
                    Duration::from_secs(secs)
                }
                None => DEFAULT_URL_TTL,
            };
            Ok(UrlStrategy::Presigned { expires_in })
        }
        Some(other) => Err(ConfigError::Invalid {
            name: MEDIA_URL_STRATEGY,
            reason: format!("'{}' (expected path or presigned)", other),
        }),
    }
}
