//! Push notification payload contract
//!
//! The delivery mechanism is an external collaborator; this is only the
//! shape handed to the transport. Delivery is best-effort.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Outbound push notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Opaque structured payload for the client app
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, Value>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: HashMap::new(),
        }
    }

    /// Attach a structured data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
