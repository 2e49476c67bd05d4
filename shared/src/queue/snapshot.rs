//! Live queue snapshot types
//!
//! Subscribers always receive the full sorted list of active entries for
//! a shop, never a diff. Queues are small, so simplicity wins over
//! bandwidth.

use super::types::QueueStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One active entry as seen in live queue views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Entry id ("entry:…")
    pub id: String,
    /// Public reference code shown to the customer
    pub public_code: String,
    /// Position within the (shop, worker) partition, lower = sooner
    pub position: u32,
    pub status: QueueStatus,
    /// Display name of the customer (guest name or user ref)
    pub customer_name: String,
    /// Assigned worker id, if the entry targets a specific worker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Full active-queue snapshot for a shop, all workers included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Shop id ("shop:…")
    pub shop: String,
    /// Monotonic snapshot version, incremented per publication
    pub version: u64,
    /// Active entries ordered by (worker, position)
    pub entries: Vec<EntrySummary>,
    /// Time the snapshot was computed
    pub taken_at: DateTime<Utc>,
}

impl QueueSnapshot {
    /// Number of waiting/served entries in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
