//! HTTP routes for running the handler outside the function platform.

pub mod local;

pub use local::{local_routes, BODY_LIMIT};
