//! Function entry point: builds the context once, then serves invocations.

use demo_api::{handle, AppState, Event, Reply, Settings};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

async fn function_handler(state: &AppState, event: LambdaEvent<Value>) -> Result<Reply, Error> {
    tracing::debug!(request_id = %event.context.request_id, "invocation");
    Ok(handle(state, Event::from_payload(event.payload)).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env().add_directive("demo_api=info".parse()?))
        .without_time()
        .init();

    let settings = Settings::from_env();
    let state = AppState::init(&settings).await;
    tracing::info!(db = state.db.is_some(), storage = state.objects.is_some(), "cold start complete");

    run(service_fn(|event| function_handler(&state, event))).await
}
