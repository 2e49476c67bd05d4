//! Queue Entry Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::queue::{Customer, EntrySummary, QueueStatus, ServiceLine};
use surrealdb::RecordId;

/// Queue entry entity — one numbered place in a (shop, worker) partition
///
/// `total_cost` is fixed at creation from the rate card of that instant
/// and never rewritten. `public_code` is globally unique across all
/// entries regardless of status (unique index on the table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub shop: RecordId,
    /// Partition worker; `None` means the shop-level queue
    pub worker: Option<RecordId>,
    pub customer: Customer,
    pub services: Vec<ServiceLine>,
    pub total_cost: Decimal,
    /// Unique among active entries of the partition, lower = sooner
    pub position: u32,
    pub public_code: String,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Entry id as a "entry:…" string
    ///
    /// Only valid on persisted entries.
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Project into the wire-level summary used by queue views
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id_string(),
            public_code: self.public_code.clone(),
            position: self.position,
            status: self.status,
            customer_name: self.customer.display_name().to_string(),
            worker: self.worker.as_ref().map(|w| w.to_string()),
            total_cost: self.total_cost,
            created_at: self.created_at,
        }
    }
}
