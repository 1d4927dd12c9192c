use std::sync::Arc;

use axum::extract::State;
use teloxide::prelude::Requester;
use url::Url;

use crate::{error::ErrorServer, state::ServerState};

pub async fn info() -> &'static str {
    "Mino NFT bot is running!"
}

/// Points Telegram at `{WEBHOOK_URL}/{token}`.
pub async fn set_webhook(
    State(server_state): State<Arc<ServerState>>,
) -> Result<String, ErrorServer> {
    let endpoint = server_state.config().webhook_endpoint().ok_or_else(|| {
        ErrorServer::bad_request("WEBHOOK_URL is not configured")
    })?;

    register_webhook(&server_state, &endpoint).await?;
    let base = server_state.config().webhook_url.clone().unwrap_or_default();
    Ok(format!("Webhook set to {}/<token>", base))
}

pub async fn register_webhook(server_state: &ServerState, endpoint: &str) -> Result<(), ErrorServer> {
    let url = Url::parse(endpoint).map_err(|e| {
        ErrorServer::bad_request(format!("Invalid webhook URL: {}", e))
    })?;

    server_state.bot().set_webhook(url).await.map_err(|e| {
        log::error!("Failed to set webhook: {}", e);
        ErrorServer::internal(format!("Failed to set webhook: {}", e))
    })?;

    log::info!("Webhook registered");
    Ok(())
}
