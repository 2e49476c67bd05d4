//! Push Transport
//!
//! Delivery seam for push notifications. The HTTP transport posts to an
//! external push gateway; the in-memory transport backs tests and local
//! development.

use async_trait::async_trait;
use serde::Serialize;
use shared::Notification;
use shared::error::{AppError, AppResult, ErrorCode};
use std::sync::Mutex;

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Deliver one notification to one device token
    async fn deliver(&self, token: &str, notification: &Notification) -> AppResult<()>;
}

#[derive(Serialize)]
struct PushPayload<'a> {
    token: &'a str,
    #[serde(flatten)]
    notification: &'a Notification,
}

/// Posts notifications to an HTTP push gateway
pub struct HttpPushTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPushTransport {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn deliver(&self, token: &str, notification: &Notification) -> AppResult<()> {
        let mut request = self.client.post(&self.endpoint).json(&PushPayload {
            token,
            notification,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_message(ErrorCode::PushDeliveryFailed, format!("Push request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::PushDeliveryFailed,
                format!("Push gateway returned {}", response.status()),
            ));
        }
        Ok(())
    }
}

/// Stands in when no push gateway is configured; logs and discards
pub struct NoopPushTransport;

#[async_trait]
impl PushTransport for NoopPushTransport {
    async fn deliver(&self, _token: &str, notification: &Notification) -> AppResult<()> {
        tracing::debug!(title = %notification.title, "No push gateway configured, discarding notification");
        Ok(())
    }
}

/// Records deliveries instead of sending them
#[derive(Default)]
pub struct MemoryPushTransport {
    delivered: Mutex<Vec<(String, Notification)>>,
}

impl MemoryPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order
    pub fn delivered(&self) -> Vec<(String, Notification)> {
        self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PushTransport for MemoryPushTransport {
    async fn deliver(&self, token: &str, notification: &Notification) -> AppResult<()> {
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push((token.to_string(), notification.clone()));
        }
        Ok(())
    }
}
