//! Queue View API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::core::ServerState;
use shared::error::AppResult;
use shared::queue::EntrySummary;

/// Query params for the active queue view
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    /// Shop id ("shop:…")
    pub shop: String,
    /// Optional worker id to narrow to one partition
    pub worker: Option<String>,
}

/// Ordered active entries for a shop, or one worker's partition
pub async fn active_queue(
    State(state): State<ServerState>,
    Query(query): Query<QueueQuery>,
) -> AppResult<Json<Vec<EntrySummary>>> {
    let entries = state
        .queue
        .get_active_queue(&query.shop, query.worker.as_deref())
        .await?;
    Ok(Json(entries))
}

/// SSE stream of full queue snapshots for a shop
///
/// Lagged receivers skip ahead to the next snapshot; every event is a
/// complete view, so nothing is lost by skipping.
pub async fn live(
    State(state): State<ServerState>,
    Path(shop): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let receiver = state.queue.subscribe(&shop).await?;

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => match Event::default().event("snapshot").json_data(&snapshot) {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to serialize queue snapshot");
                        continue;
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Live subscriber lagged, skipping to newest");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
