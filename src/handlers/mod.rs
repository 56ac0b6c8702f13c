//! Invocation entry: parse the action request, run it, wrap the outcome.

pub mod request;
pub mod status;

pub use request::{Action, ActionRequest, Event};
pub use status::{status, StatusBody};

use crate::error::AppError;
use crate::response::Reply;
use crate::service;
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;

/// Outermost boundary. Every outcome, including a malformed body, becomes a reply.
pub async fn handle(state: &AppState, event: Event) -> Reply {
    match dispatch(state, event.body.as_deref()).await {
        Ok(body) => Reply::ok(body),
        Err(e) => {
            tracing::warn!(error = %e, "action failed");
            Reply::error(&e)
        }
    }
}

async fn dispatch(state: &AppState, body: Option<&str>) -> Result<Value, AppError> {
    let req = ActionRequest::parse(body)?;
    let action = req.action();
    tracing::info!(%action, "dispatch");
    match action {
        Action::List => json(service::list_items(state).await?),
        Action::Create => json(service::create_item(state, &req).await?),
        Action::Delete => json(service::delete_item(state, &req).await?),
        Action::Upload => json(service::upload_media(state, &req).await?),
        Action::ListMedia => json(service::list_media(state).await?),
        Action::DeleteMedia => json(service::delete_media(state, &req).await?),
        Action::Status => json(status(state)),
    }
}

fn json<T: Serialize>(value: T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}
