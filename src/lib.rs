//! Items-and-media action handler: one JSON entry point over PostgreSQL and S3.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod storage;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use handlers::{handle, Action, ActionRequest, Event};
pub use response::Reply;
pub use routes::local_routes;
pub use state::AppState;
pub use storage::{ObjectStore, UrlStrategy};
pub use store::Store;
