//! Live Feed
//!
//! Shop-scoped broadcast of full queue snapshots. Every committed
//! mutation triggers a fresh snapshot; subscribers that fall behind
//! simply miss intermediate versions (broadcast channel semantics),
//! which is fine because each snapshot is complete.

use chrono::Utc;
use dashmap::DashMap;
use shared::queue::{EntrySummary, QueueSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered snapshots per shop channel; laggards skip to the newest
const CHANNEL_CAPACITY: usize = 16;

struct ShopChannel {
    sender: broadcast::Sender<QueueSnapshot>,
    version: AtomicU64,
}

impl ShopChannel {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            version: AtomicU64::new(0),
        }
    }
}

#[derive(Default)]
pub struct LiveFeed {
    channels: DashMap<String, ShopChannel>,
}

impl Default for ShopChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a shop's snapshot stream
    pub fn subscribe(&self, shop: &str) -> broadcast::Receiver<QueueSnapshot> {
        self.channels
            .entry(shop.to_string())
            .or_default()
            .sender
            .subscribe()
    }

    /// Publish a fresh full snapshot for a shop
    ///
    /// Entries must already be ordered by (worker, position).
    pub fn publish(&self, shop: &str, entries: Vec<EntrySummary>) {
        let channel = self.channels.entry(shop.to_string()).or_default();
        let version = channel.version.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = QueueSnapshot {
            shop: shop.to_string(),
            version,
            entries,
            taken_at: Utc::now(),
        };
        // Err means no live subscribers; nothing to do
        if channel.sender.send(snapshot).is_err() {
            debug!(shop, version, "Snapshot published with no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_snapshot() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe("shop:s1");
        feed.publish("shop:s1", vec![]);
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.shop, "shop:s1");
        assert_eq!(snapshot.version, 1);
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_versions_are_monotonic_per_shop() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe("shop:s1");
        feed.publish("shop:s1", vec![]);
        feed.publish("shop:s2", vec![]);
        feed.publish("shop:s1", vec![]);
        assert_eq!(rx.recv().await.unwrap().version, 1);
        assert_eq!(rx.recv().await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_shops_are_isolated() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe("shop:s1");
        feed.publish("shop:s2", vec![]);
        assert!(rx.try_recv().is_err());
    }
}
