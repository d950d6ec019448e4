use std::sync::Arc;

use anyhow::Context;

use farmstand_api::app::{build_app, services::AppServices};
use farmstand_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    farmstand_observability::init();

    let config = AppConfig::from_env()?;
    let services = Arc::new(AppServices::from_config(&config).await?);
    tracing::info!(backend = services.backend().as_str(), "product store ready");

    let app = build_app(config.jwt_secret.clone(), services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
