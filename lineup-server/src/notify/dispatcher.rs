//! Push Dispatcher
//!
//! Fire-and-forget delivery of queue notifications. Mutations enqueue a
//! job and move on; a full channel or a failed delivery is logged and
//! dropped. Nothing here ever fails a queue mutation.

use super::transport::PushTransport;
use crate::db::repository::DeviceTokenRepository;
use shared::Notification;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One queued delivery: a registered user and their notification
#[derive(Debug, Clone)]
pub struct PushJob {
    pub user: String,
    pub notification: Notification,
}

pub struct PushService {
    sender: mpsc::Sender<PushJob>,
    /// Taken once when the worker starts
    receiver: Mutex<Option<mpsc::Receiver<PushJob>>>,
    transport: Arc<dyn PushTransport>,
    tokens: DeviceTokenRepository,
}

impl PushService {
    pub fn new(
        capacity: usize,
        transport: Arc<dyn PushTransport>,
        tokens: DeviceTokenRepository,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            transport,
            tokens,
        }
    }

    /// Enqueue a job; drops it with a warning when the channel is full
    pub fn enqueue(&self, user: impl Into<String>, notification: Notification) {
        let job = PushJob {
            user: user.into(),
            notification,
        };
        match self.sender.try_send(job) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(user = %job.user, "Push queue full, dropping notification");
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(user = %job.user, "Push worker stopped, dropping notification");
            }
        }
    }

    /// Worker loop; runs until cancelled or the channel closes
    pub async fn run(&self, cancel: CancellationToken) {
        let receiver = match self.receiver.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        let Some(mut receiver) = receiver else {
            warn!("Push worker already started, refusing to run twice");
            return;
        };

        info!("Push worker started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Push worker shutting down");
                    break;
                }
                job = receiver.recv() => {
                    match job {
                        Some(job) => self.deliver(job).await,
                        None => break,
                    }
                }
            }
        }
    }

    async fn deliver(&self, job: PushJob) {
        let tokens = match self.tokens.tokens_for_user(&job.user).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(user = %job.user, error = %e, "Failed to load device tokens");
                return;
            }
        };

        if tokens.is_empty() {
            debug!(user = %job.user, "No device token registered, skipping push");
            return;
        }

        for token in tokens {
            if let Err(e) = self.transport.deliver(&token.token, &job.notification).await {
                warn!(user = %job.user, error = %e, "Push delivery failed");
            }
        }
    }
}
