mod config;
mod error;
mod routes;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "examroom_api=info,examroom_core=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    info!(
        "Starting exam room engine API (conflict policy: {:?})",
        config.conflict_policy
    );

    let app = router(AppState {
        conflict_policy: config.conflict_policy,
    });

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    info!("API server listening on http://{}", config.addr);
    info!("Try: curl http://{}/api/health", config.addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
