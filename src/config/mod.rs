//! Process configuration: environment settings and connection-string parsing.

pub mod database;
pub mod settings;

pub use database::DatabaseTarget;
pub use settings::Settings;
