//! Local server: same handler and configuration, served over plain HTTP.

use demo_api::{local_routes, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("demo_api=info".parse()?))
        .init();

    let settings = Settings::from_env();
    let state = AppState::init(&settings).await;
    if let Some(err) = &state.startup_error {
        tracing::warn!(error = %err, "serving in degraded mode");
    }

    let addr = std::env::var("LOCAL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, local_routes(state)).await?;
    Ok(())
}
