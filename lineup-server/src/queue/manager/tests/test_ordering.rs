//! Position allocation, move-down and queue views

use super::*;
use shared::error::ErrorCode;
use shared::queue::QueueStatus;

#[tokio::test]
async fn test_positions_allocate_sequentially() {
    let q = TestQueue::new().await;
    for expected in 1..=3 {
        let entry = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
        assert_eq!(entry.position, expected);
    }
}

#[tokio::test]
async fn test_partitions_are_independent() {
    let q = TestQueue::new().await;

    // Worker queue and shop-level queue each start at 1
    let on_worker = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let mut request = q.request(guest("Bea"));
    request.worker = None;
    let shop_level = q.manager.create_entry(request).await.unwrap();

    assert_eq!(on_worker.position, 1);
    assert_eq!(shop_level.position, 1);
}

#[tokio::test]
async fn test_move_down_swaps_with_successor() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    let c = q.manager.create_entry(q.request(guest("Cleo"))).await.unwrap();
    assert_eq!((a.position, b.position, c.position), (1, 2, 3));

    let b = q.manager.move_down(&b.id_string(), &q.as_worker()).await.unwrap();
    assert_eq!(b.position, 3);

    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    let order: Vec<(&str, u32)> = queue
        .iter()
        .map(|e| (e.customer_name.as_str(), e.position))
        .collect();
    assert_eq!(order, vec![("Ana", 1), ("Cleo", 2), ("Bea", 3)]);
}

#[tokio::test]
async fn test_move_down_at_tail_fails_already_last() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();

    let err = q.manager.move_down(&b.id_string(), &q.as_worker()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyLast);

    // Positions untouched by the failed swap
    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    assert_eq!(queue[0].id, a.id_string());
    assert_eq!(queue[0].position, 1);
    assert_eq!(queue[1].id, b.id_string());
    assert_eq!(queue[1].position, 2);
}

#[tokio::test]
async fn test_move_down_requires_worker_or_operator() {
    let q = TestQueue::new().await;
    q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(registered())).await.unwrap();

    let err = q
        .manager
        .move_down(&b.id_string(), &as_customer(REGISTERED_USER))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotAuthorized);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_move_down_rechecks_status_after_taking_the_lock() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();

    // Hold the partition lock so the move sits in front of it
    let shop_id: surrealdb::RecordId = q.shop.parse().unwrap();
    let worker_id: surrealdb::RecordId = q.worker.parse().unwrap();
    let lock = q.manager.partition_lock(&shop_id, Some(worker_id));
    let guard = lock.lock().await;

    let moving = {
        let manager = q.manager.clone();
        let id = a.id_string();
        let requester = q.as_worker();
        tokio::spawn(async move { manager.move_down(&id, &requester).await })
    };

    // Cancel the entry out from under the waiting move, then let it in
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    q.manager.cancel_entry(&a.id_string(), &q.as_operator()).await.unwrap();
    drop(guard);

    let err = moving.await.unwrap().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);

    // Bea's position is untouched
    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, b.id_string());
    assert_eq!(queue[0].position, b.position);
}

#[tokio::test]
async fn test_full_scenario_walkthrough() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    let c = q.manager.create_entry(q.request(guest("Cleo"))).await.unwrap();
    assert_eq!((a.position, b.position, c.position), (1, 2, 3));

    // Bea steps aside for Cleo
    let b = q.manager.move_down(&b.id_string(), &q.as_worker()).await.unwrap();
    assert_eq!(b.position, 3);

    // Then gives up entirely
    q.manager.cancel_entry(&b.id_string(), &q.as_operator()).await.unwrap();
    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    let order: Vec<(&str, u32)> = queue
        .iter()
        .map(|e| (e.customer_name.as_str(), e.position))
        .collect();
    assert_eq!(order, vec![("Ana", 1), ("Cleo", 2)]);

    // Ana is served; history carries her original total
    q.manager
        .advance_status(&a.id_string(), QueueStatus::Completed, &q.as_worker())
        .await
        .unwrap();
    let history = crate::db::repository::HistoryRepository::new(q.db.db.clone());
    let records = history.find_by_entry(&a.id.clone().unwrap()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total_cost, a.total_cost);

    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].customer_name, "Cleo");
    assert_eq!(queue[0].position, 2);
}

#[tokio::test]
async fn test_active_queue_excludes_terminal_entries() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let b = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    q.manager.cancel_entry(&a.id_string(), &q.as_operator()).await.unwrap();

    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, b.id_string());
}

#[tokio::test]
async fn test_in_progress_entries_stay_in_queue_view() {
    let q = TestQueue::new().await;
    let a = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    q.manager
        .advance_status(&a.id_string(), QueueStatus::InProgress, &q.as_worker())
        .await
        .unwrap();

    let queue = q
        .manager
        .get_active_queue(&q.shop, Some(&q.worker))
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].status, QueueStatus::InProgress);
}
