//! Local routes: POST / runs one invocation with the request body as the event body.

use crate::handlers::{handle, Event};
use crate::response::Reply;
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

/// Base64 inflates uploads by a third; this leaves room for ~12 MiB files.
pub const BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn invoke(State(state): State<AppState>, body: String) -> Reply {
    handle(&state, Event::from_body(body)).await
}

async fn probe(State(state): State<AppState>) -> Reply {
    handle(&state, Event::default()).await
}

/// POST / (invoke), GET / (status probe), GET /health.
pub fn local_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(probe).post(invoke))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .with_state(state)
}
