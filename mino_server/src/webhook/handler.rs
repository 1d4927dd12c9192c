use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use mino_bot::bot::handler_tree::dispatch_update;
use teloxide::types::Update;

use crate::{error::ErrorServer, state::ServerState};

/// Receives an update from Telegram. The path segment must be the bot token;
/// anything else is answered as if the route did not exist.
pub async fn webhook(
    State(server_state): State<Arc<ServerState>>,
    Path(token): Path<String>,
    body: Result<Json<Update>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ErrorServer> {
    if token != server_state.config().token {
        return Err(ErrorServer::not_found());
    }

    let Json(update) = body.map_err(|e| {
        log::warn!("Rejected webhook body: {}", e);
        ErrorServer::bad_request("Invalid update")
    })?;

    let me = server_state.me().await.map_err(|e| {
        log::error!("Failed to fetch bot info: {:#}", e);
        ErrorServer::new(StatusCode::SERVICE_UNAVAILABLE, "Bot info unavailable")
    })?;

    tokio::spawn(async move {
        dispatch_update(
            server_state.handler(),
            server_state.bot(),
            me,
            update,
            server_state.bot_deps(),
        )
        .await;
    });

    Ok((StatusCode::OK, "OK"))
}
