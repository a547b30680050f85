//! ITSM console composition root.

#![forbid(unsafe_code)]

mod console_config;
mod console_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use itsm_core::AppError;
use itsm_infrastructure::HttpItsmClient;
use tracing::info;

use crate::console_config::{ConsoleConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let itsm_client = Arc::new(HttpItsmClient::new(
        config.itsm_api_base_url.clone(),
        config.http_timeout,
    )?);
    let app_state = AppState::new(itsm_client.clone(), itsm_client.clone(), itsm_client);

    let app = console_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        itsm_api_base_url = %config.itsm_api_base_url,
        "itsm-console listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("console server error: {error}")))
}
