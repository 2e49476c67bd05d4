//! Worker Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Worker entity (staff member with an own queue partition)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub shop: RecordId,
    pub name: String,
    /// External user ref, if the worker has an account
    pub user: Option<String>,
    /// Whether the worker currently accepts queue entries
    pub available: bool,
    /// Lifetime number of completed services
    pub served_count: u64,
}
