//! Device Token Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Push target registered by the identity system for a user's device
///
/// Stale or missing tokens are a logged no-op at dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// External user ref
    pub user: String,
    pub token: String,
    /// Client platform tag ("ios", "android", …)
    pub platform: String,
}
