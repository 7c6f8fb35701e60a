//! Vitrine admin console API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod session_cookies;
mod state;

use tracing::info;
use vitrine_core::AppError;

use crate::api_config::ApiConfig;
use crate::api_services::AuthorizationAdapters;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect_and_migrate(config.database_url.as_str()).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    if let Some(bootstrap_admin) = config.bootstrap_admin.as_ref() {
        api_services::ensure_bootstrap_admin(&pool, bootstrap_admin).await?;
    }

    let app_state =
        api_services::build_app_state(AuthorizationAdapters::postgres(&pool), &config)?;
    api_services::spawn_store_health_monitor(
        app_state.store_health.clone(),
        app_state.permission_store.clone(),
        config.store_health_interval,
    );

    let app = api_router::build_router(app_state)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "vitrine-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
