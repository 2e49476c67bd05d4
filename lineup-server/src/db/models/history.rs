//! Service History Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::queue::ServiceLine;
use surrealdb::RecordId;

/// Append-only record of a completed service
///
/// Written exactly once, inside the `* → completed` transition of the
/// originating entry. Never updated or deleted by the queue core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Originating queue entry
    pub entry: RecordId,
    pub shop: RecordId,
    pub worker: Option<RecordId>,
    /// Registered customer ref; `None` for guests
    pub user: Option<String>,
    pub services: Vec<ServiceLine>,
    pub total_cost: Decimal,
    pub completed_at: DateTime<Utc>,
}
