//! Queue View API Module
//!
//! Read-only queue views plus the live SSE subscription.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Queue router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/queue", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::active_queue))
        .route("/{shop}/live", get(handler::live))
}
