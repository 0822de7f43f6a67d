//! Blog API Server
//!
//! Author: hephaex@gmail.com

use anyhow::Context;
use blog_api::{create_router, db, state::AppState};
use blog_core::{AppConfig, LoggingConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);

    if config.auth.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development signing key");
    }

    let pool = db::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config, pool));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Blog API Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs/", addr);
    tracing::info!("OpenAPI document at http://{}/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Defaults, then the `BLOG_CONFIG` file if set, then environment variables
fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("BLOG_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
