//! Entry API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::QueueEntry;
use crate::queue::CreateEntry;
use shared::error::AppResult;
use shared::queue::{QueueStatus, Requester};

/// Create a queue entry
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateEntry>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.create_entry(payload).await?;
    Ok(Json(entry))
}

/// Get entry by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.get_entry(&id).await?;
    Ok(Json(entry))
}

/// Get entry by its public code
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.get_entry_by_code(&code).await?;
    Ok(Json(entry))
}

/// Cancel request: who is asking
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub requester: Requester,
}

/// Cancel an entry
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.cancel_entry(&id, &payload.requester).await?;
    Ok(Json(entry))
}

/// Advance request: target status and who is asking
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub status: QueueStatus,
    pub requester: Requester,
}

/// Advance an entry's status
pub async fn advance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AdvanceRequest>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state
        .queue
        .advance_status(&id, payload.status, &payload.requester)
        .await?;
    Ok(Json(entry))
}

/// Move-down request: who is asking
#[derive(Debug, Deserialize)]
pub struct MoveDownRequest {
    pub requester: Requester,
}

/// Swap an entry with its successor
pub async fn move_down(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MoveDownRequest>,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.move_down(&id, &payload.requester).await?;
    Ok(Json(entry))
}
