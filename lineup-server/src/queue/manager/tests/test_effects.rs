//! Push notifications, live snapshots and cost immutability

use super::*;
use shared::queue::QueueStatus;
use std::time::Duration;

#[tokio::test]
async fn test_registered_customer_receives_push() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();

    let delivered = q.wait_for_pushes(1).await;
    assert_eq!(delivered[0].0, "device-token-ana");
    assert_eq!(
        delivered[0].1.data.get("public_code").and_then(|v| v.as_str()),
        Some(entry.public_code.as_str())
    );
}

#[tokio::test]
async fn test_guest_entry_produces_no_push() {
    let q = TestQueue::new().await;
    q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    // A registered entry afterwards acts as a fence: once its push has
    // arrived, the guest's (if wrongly enqueued) would have come first
    q.manager.create_entry(q.request(registered())).await.unwrap();

    let delivered = q.wait_for_pushes(1).await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "device-token-ana");
}

#[tokio::test]
async fn test_every_mutation_notifies_the_customer() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    q.manager.create_entry(q.request(guest("Filler"))).await.unwrap();
    q.manager.move_down(&entry.id_string(), &q.as_worker()).await.unwrap();
    q.manager
        .advance_status(&entry.id_string(), QueueStatus::InProgress, &q.as_worker())
        .await
        .unwrap();
    q.manager
        .cancel_entry(&entry.id_string(), &q.as_operator())
        .await
        .unwrap();

    // create + move + advance + cancel
    let delivered = q.wait_for_pushes(4).await;
    assert_eq!(delivered.len(), 4);
}

#[tokio::test]
async fn test_total_cost_survives_rate_card_change() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let original = entry.total_cost;

    // The shop doubles its price afterwards
    let service_id: surrealdb::RecordId = q.cut.parse().unwrap();
    q.db.db
        .query("UPDATE $service SET price = $price")
        .bind(("service", service_id))
        .bind(("price", "31.00".parse::<rust_decimal::Decimal>().unwrap()))
        .await
        .unwrap();

    let reloaded = q.manager.get_entry(&entry.id_string()).await.unwrap();
    assert_eq!(reloaded.total_cost, original);

    // New entries pay the new price
    let later = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    assert_eq!(later.total_cost, "31.00".parse().unwrap());
}

#[tokio::test]
async fn test_live_subscriber_sees_snapshot_after_each_mutation() {
    let q = TestQueue::new().await;
    let mut rx = q.manager.subscribe(&q.shop).await.unwrap();

    let entry = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].public_code, entry.public_code);

    q.manager
        .cancel_entry(&entry.id_string(), &q.as_operator())
        .await
        .unwrap();
    let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.version, 2);
}

#[tokio::test]
async fn test_subscribe_rejects_unknown_shop() {
    let q = TestQueue::new().await;
    let err = q.manager.subscribe("shop:nowhere").await.unwrap_err();
    assert_eq!(err.code, shared::error::ErrorCode::ShopNotFound);
}
