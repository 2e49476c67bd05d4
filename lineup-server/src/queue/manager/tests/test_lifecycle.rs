//! Entry lifecycle: creation, transitions, authorization, history

use super::*;
use crate::db::repository::HistoryRepository;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::queue::QueueStatus;

#[tokio::test]
async fn test_create_entry_starts_pending_at_position_one() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();

    assert_eq!(entry.status, QueueStatus::Pending);
    assert_eq!(entry.position, 1);
    assert_eq!(entry.public_code.len(), 6);
    assert_eq!(entry.total_cost, "15.50".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn test_create_multi_line_cost() {
    let q = TestQueue::new().await;
    let mut request = q.request(guest("Ana"));
    request.services = vec![
        shared::queue::ServiceLine::new(q.cut.clone(), 2),
        shared::queue::ServiceLine::new(q.shave.clone(), 1),
    ];
    let entry = q.manager.create_entry(request).await.unwrap();
    assert_eq!(entry.total_cost, "39.00".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn test_create_rejects_unoffered_service_without_consuming_position() {
    let q = TestQueue::new().await;
    let mut request = q.request(guest("Ana"));
    request.services = vec![shared::queue::ServiceLine::new("shop_service:massage", 1)];
    let err = q.manager.create_entry(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UnofferedService);

    // The failed create left no hole in the position sequence
    let entry = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    assert_eq!(entry.position, 1);
    let queue = q.manager.get_active_queue(&q.shop, None).await.unwrap();
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_create_rejects_unknown_shop() {
    let q = TestQueue::new().await;
    let mut request = q.request(guest("Ana"));
    request.shop = "shop:nowhere".to_string();
    let err = q.manager.create_entry(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ShopNotFound);
}

#[tokio::test]
async fn test_create_rejects_guest_without_phone() {
    let q = TestQueue::new().await;
    let request = q.request(shared::queue::Customer::Guest {
        name: "Ana".to_string(),
        phone: "".to_string(),
    });
    let err = q.manager.create_entry(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn test_advance_walks_the_status_machine() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id_string();

    let entry = q
        .manager
        .advance_status(&id, QueueStatus::InProgress, &q.as_worker())
        .await
        .unwrap();
    assert_eq!(entry.status, QueueStatus::InProgress);

    let entry = q
        .manager
        .advance_status(&id, QueueStatus::Completed, &q.as_worker())
        .await
        .unwrap();
    assert_eq!(entry.status, QueueStatus::Completed);
}

#[tokio::test]
async fn test_terminal_entry_rejects_all_transitions() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id_string();
    q.manager.cancel_entry(&id, &q.as_operator()).await.unwrap();

    let err = q
        .manager
        .advance_status(&id, QueueStatus::InProgress, &q.as_worker())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let err = q.manager.cancel_entry(&id, &q.as_operator()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_advance_to_cancelled_is_refused() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let err = q
        .manager
        .advance_status(&entry.id_string(), QueueStatus::Cancelled, &q.as_worker())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn test_authorization_matrix() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id_string();

    // A stranger can neither cancel nor advance
    let stranger = as_customer("user:mallory");
    let err = q.manager.cancel_entry(&id, &stranger).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotAuthorized);
    let err = q
        .manager
        .advance_status(&id, QueueStatus::InProgress, &stranger)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotAuthorized);

    // The customer may not advance their own entry
    let owner = as_customer(REGISTERED_USER);
    let err = q
        .manager
        .advance_status(&id, QueueStatus::InProgress, &owner)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotAuthorized);

    // But they may cancel it
    let entry = q.manager.cancel_entry(&id, &owner).await.unwrap();
    assert_eq!(entry.status, QueueStatus::Cancelled);
}

#[tokio::test]
async fn test_completion_writes_exactly_one_history_record() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id.clone().unwrap();

    q.manager
        .advance_status(&entry.id_string(), QueueStatus::Completed, &q.as_worker())
        .await
        .unwrap();

    let history = HistoryRepository::new(q.db.db.clone());
    let records = history.find_by_entry(&id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total_cost, entry.total_cost);
    assert_eq!(records[0].user.as_deref(), Some(REGISTERED_USER));
}

#[tokio::test]
async fn test_repeat_completion_cannot_duplicate_history() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id.clone().unwrap();
    q.manager
        .advance_status(&entry.id_string(), QueueStatus::Completed, &q.as_worker())
        .await
        .unwrap();

    // Replaying the completion against the now-terminal row must not
    // commit anything, even straight at the repository
    let entries = crate::db::repository::EntryRepository::new(q.db.db.clone());
    let replay = crate::db::models::HistoryRecord {
        id: None,
        entry: id.clone(),
        shop: entry.shop.clone(),
        worker: entry.worker.clone(),
        user: entry.customer.user().map(str::to_string),
        services: entry.services.clone(),
        total_cost: entry.total_cost,
        completed_at: chrono::Utc::now(),
    };
    let committed = entries
        .complete(&id, replay, entry.worker.as_ref(), QueueStatus::Pending)
        .await
        .unwrap();
    assert!(!committed);

    let history = HistoryRepository::new(q.db.db.clone());
    assert_eq!(history.find_by_entry(&id).await.unwrap().len(), 1);

    let workers = crate::db::repository::WorkerRepository::new(q.db.db.clone());
    let worker = workers.find_by_id(&q.worker).await.unwrap().unwrap();
    assert_eq!(worker.served_count, 1);
}

#[tokio::test]
async fn test_cancellation_writes_no_history() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    let id = entry.id.clone().unwrap();

    q.manager
        .cancel_entry(&entry.id_string(), &q.as_operator())
        .await
        .unwrap();

    let history = HistoryRepository::new(q.db.db.clone());
    assert!(history.find_by_entry(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_completion_increments_worker_served_count() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(registered())).await.unwrap();
    q.manager
        .advance_status(&entry.id_string(), QueueStatus::Completed, &q.as_worker())
        .await
        .unwrap();

    let workers = crate::db::repository::WorkerRepository::new(q.db.db.clone());
    let worker = workers.find_by_id(&q.worker).await.unwrap().unwrap();
    assert_eq!(worker.served_count, 1);
}

#[tokio::test]
async fn test_closed_shop_refuses_walk_ins() {
    let q = TestQueue::new().await;
    let shops = crate::db::repository::ShopRepository::new(q.db.db.clone());
    let shop_id: surrealdb::RecordId = q.shop.parse().unwrap();
    shops.set_open(&shop_id, false).await.unwrap();

    let err = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ShopClosed);
}

#[tokio::test]
async fn test_unavailable_worker_refused() {
    let q = TestQueue::new().await;
    let workers = crate::db::repository::WorkerRepository::new(q.db.db.clone());
    let worker_id: surrealdb::RecordId = q.worker.parse().unwrap();
    workers.set_available(&worker_id, false).await.unwrap();

    let err = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::WorkerUnavailable);
}

#[tokio::test]
async fn test_code_collision_regenerates() {
    let codes = ScriptedCodes::new(&["AAAAAA", "AAAAAA", "BBBBBB"]);
    let q = TestQueue::with_code_source(codes.clone()).await;

    let first = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    assert_eq!(first.public_code, "AAAAAA");

    // Second create collides once, then lands on the fresh code
    let second = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap();
    assert_eq!(second.public_code, "BBBBBB");
    assert_eq!(codes.calls(), 3);
}

#[tokio::test]
async fn test_saturated_code_space_fails_without_consuming_position() {
    let codes = ScriptedCodes::new(&["AAAAAA"]);
    let q = TestQueue::with_code_source(codes).await;
    q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();

    let err = q.manager.create_entry(q.request(guest("Bea"))).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CodeSpaceExhausted);

    let queue = q.manager.get_active_queue(&q.shop, None).await.unwrap();
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_lookup_by_code() {
    let q = TestQueue::new().await;
    let entry = q.manager.create_entry(q.request(guest("Ana"))).await.unwrap();
    let found = q.manager.get_entry_by_code(&entry.public_code).await.unwrap();
    assert_eq!(found.id_string(), entry.id_string());

    let err = q.manager.get_entry_by_code("ZZZZZZ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EntryNotFound);
}
