use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    info::handler::{info, set_webhook},
    state::ServerState,
    webhook::handler::webhook,
};

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/set_webhook", get(set_webhook))
        .route("/{token}", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
