//! Entry API Module
//!
//! All mutations go through the QueueManager; handlers only translate
//! HTTP to manager calls.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Entry router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/entries", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/code/{code}", get(handler::get_by_code))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/status", post(handler::advance))
        .route("/{id}/move-down", post(handler::move_down))
}
