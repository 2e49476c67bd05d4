//! Queue Manager
//!
//! Orchestrates every queue mutation: validation, pricing, position
//! allocation under the partition lock, persistence, and the two
//! fire-and-forget effects (push notification, live snapshot). This is
//! the only writer of entry state; handlers and repositories never
//! mutate around it.

#[cfg(test)]
mod tests;

use crate::db::DbService;
use crate::db::models::{HistoryRecord, QueueEntry, Shop};
use crate::db::repository::{EntryRepository, ShopRepository, WorkerRepository};
use crate::live::LiveFeed;
use crate::notify::{PushService, messages};
use crate::queue::code::{CodeSource, MAX_ATTEMPTS, RandomCodeSource};
use crate::queue::cost::CostResolver;
use crate::queue::partition::{PartitionKey, PartitionLocks};
use crate::utils::validation::{validate_customer, validate_services};
use chrono::Utc;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::queue::{Customer, EntrySummary, QueueStatus, Requester, ServiceLine};
use std::sync::Arc;
use surrealdb::RecordId;
use tracing::{error, info, warn};

/// Parameters of a new queue entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntry {
    /// Target shop id ("shop:…")
    pub shop: String,
    /// Target worker id; omit for the shop-level queue
    pub worker: Option<String>,
    pub customer: Customer,
    pub services: Vec<ServiceLine>,
}

pub struct QueueManager {
    entries: EntryRepository,
    shops: ShopRepository,
    workers: WorkerRepository,
    locks: PartitionLocks,
    codes: Arc<dyn CodeSource>,
    push: Arc<PushService>,
    live: Arc<LiveFeed>,
}

impl QueueManager {
    pub fn new(db: &DbService, push: Arc<PushService>, live: Arc<LiveFeed>) -> Self {
        Self::with_code_source(db, push, live, Arc::new(RandomCodeSource))
    }

    /// Build with an explicit code source
    pub fn with_code_source(
        db: &DbService,
        push: Arc<PushService>,
        live: Arc<LiveFeed>,
        codes: Arc<dyn CodeSource>,
    ) -> Self {
        Self {
            entries: EntryRepository::new(db.db.clone()),
            shops: ShopRepository::new(db.db.clone()),
            workers: WorkerRepository::new(db.db.clone()),
            locks: PartitionLocks::new(),
            codes,
            push,
            live,
        }
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Create a queue entry at the tail of its partition
    pub async fn create_entry(&self, request: CreateEntry) -> AppResult<QueueEntry> {
        validate_customer(&request.customer)?;
        validate_services(&request.services)?;

        let shop = self.load_shop(&request.shop).await?;
        let shop_id = shop
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Shop record without id"))?;
        if !shop.open {
            return Err(AppError::with_message(
                ErrorCode::ShopClosed,
                format!("Shop {} is not accepting walk-ins", shop.name),
            ));
        }

        let worker_id = match &request.worker {
            Some(worker_ref) => Some(self.load_available_worker(worker_ref, &shop_id).await?),
            None => None,
        };

        let rate_card = self.shops.rate_card(&shop_id).await?;
        let total_cost = CostResolver::new(&rate_card).resolve(&request.services)?;

        let key = PartitionKey::new(shop_id.clone(), worker_id.clone());
        let lock = self.locks.lock_for(&key);
        let _guard = lock.lock().await;

        let public_code = self.unique_code().await?;
        let position = self
            .entries
            .max_active_position(&shop_id, worker_id.as_ref())
            .await?
            .unwrap_or(0)
            + 1;

        let now = Utc::now();
        let entry = self
            .entries
            .create(QueueEntry {
                id: None,
                shop: shop_id.clone(),
                worker: worker_id,
                customer: request.customer,
                services: request.services,
                total_cost,
                position,
                public_code,
                status: QueueStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .await?;
        drop(_guard);

        info!(
            entry = %entry.id_string(),
            shop = %shop_id,
            position,
            code = %entry.public_code,
            "Queue entry created"
        );

        self.notify_customer(&entry, messages::entry_created(&entry.public_code, position));
        self.publish_snapshot(shop_id);
        Ok(entry)
    }

    /// Cancel an entry; allowed to its own customer, the assigned
    /// worker, or the shop operator
    pub async fn cancel_entry(&self, id: &str, requester: &Requester) -> AppResult<QueueEntry> {
        let entry = self.load_entry(id).await?;
        if !Self::may_cancel(&entry, requester) {
            return Err(AppError::not_authorized(
                "Only the entry's customer, the assigned worker or the shop operator may cancel",
            ));
        }

        let updated = self.transition(entry, QueueStatus::Cancelled).await?;
        info!(entry = %updated.id_string(), "Queue entry cancelled");

        self.notify_customer(&updated, messages::entry_cancelled(&updated.public_code));
        self.publish_snapshot(updated.shop.clone());
        Ok(updated)
    }

    /// Advance an entry's status; worker/operator only
    ///
    /// Completion writes the history record and bumps the worker's
    /// served count in the same transaction as the status flip.
    pub async fn advance_status(
        &self,
        id: &str,
        target: QueueStatus,
        requester: &Requester,
    ) -> AppResult<QueueEntry> {
        if target == QueueStatus::Cancelled {
            return Err(AppError::invalid_request(
                "Use the cancel operation to cancel an entry",
            ));
        }
        let entry = self.load_entry(id).await?;
        if !Self::may_manage(&entry, requester) {
            return Err(AppError::not_authorized(
                "Only the assigned worker or the shop operator may advance an entry",
            ));
        }

        let updated = self.transition(entry, target).await?;
        info!(entry = %updated.id_string(), status = %target, "Queue entry advanced");

        self.notify_customer(&updated, messages::status_advanced(&updated.public_code, target));
        self.publish_snapshot(updated.shop.clone());
        Ok(updated)
    }

    /// Swap an entry with its successor so it waits one place longer
    pub async fn move_down(&self, id: &str, requester: &Requester) -> AppResult<QueueEntry> {
        let entry = self.load_entry(id).await?;
        if !Self::may_manage(&entry, requester) {
            return Err(AppError::not_authorized(
                "Only the assigned worker or the shop operator may reorder the queue",
            ));
        }
        if !entry.status.is_active() {
            return Err(AppError::invalid_request(
                "Only active entries can be moved",
            ));
        }
        let entry_id = entry
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Entry record without id"))?;

        let key = PartitionKey::new(entry.shop.clone(), entry.worker.clone());
        let lock = self.locks.lock_for(&key);
        let _guard = lock.lock().await;

        // Both status and positions may have changed while we waited
        // for the lock
        let entry = self.load_entry(id).await?;
        if !entry.status.is_active() {
            return Err(AppError::invalid_request(
                "Only active entries can be moved",
            ));
        }
        let successor = self
            .entries
            .next_active_above(&entry.shop, entry.worker.as_ref(), entry.position)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AlreadyLast,
                    "Entry is already last in its queue",
                )
            })?;
        let successor_id = successor
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Entry record without id"))?;

        self.entries
            .swap_positions(&entry_id, successor.position, &successor_id, entry.position)
            .await?;
        drop(_guard);

        let updated = self.load_entry(id).await?;
        info!(
            entry = %updated.id_string(),
            position = updated.position,
            "Queue entry moved down"
        );

        self.notify_customer(&updated, messages::moved_down(&updated.public_code, updated.position));
        self.publish_snapshot(updated.shop.clone());
        Ok(updated)
    }

    /// Active entries of a shop, or of one partition when a worker is
    /// given, ordered by position
    pub async fn get_active_queue(
        &self,
        shop: &str,
        worker: Option<&str>,
    ) -> AppResult<Vec<EntrySummary>> {
        let shop_record = self.load_shop(shop).await?;
        let shop_id = shop_record
            .id
            .ok_or_else(|| AppError::internal("Shop record without id"))?;

        let entries = match worker {
            Some(worker_ref) => {
                let worker_id: RecordId = worker_ref.parse().map_err(|_| {
                    AppError::with_message(
                        ErrorCode::WorkerNotFound,
                        format!("Invalid worker ID format: {worker_ref}"),
                    )
                })?;
                self.entries
                    .active_in_partition(&shop_id, Some(&worker_id))
                    .await?
            }
            None => self.entries.active_for_shop(&shop_id).await?,
        };
        Ok(entries.iter().map(QueueEntry::summary).collect())
    }

    /// Point read by entry id
    pub async fn get_entry(&self, id: &str) -> AppResult<QueueEntry> {
        self.load_entry(id).await
    }

    /// Point read by public code
    pub async fn get_entry_by_code(&self, code: &str) -> AppResult<QueueEntry> {
        self.entries
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::entry_not_found(code))
    }

    /// Subscribe to a shop's live snapshot stream
    pub async fn subscribe(
        &self,
        shop: &str,
    ) -> AppResult<tokio::sync::broadcast::Receiver<shared::queue::QueueSnapshot>> {
        // Subscribing to an unknown shop would silently never emit
        let shop_record = self.load_shop(shop).await?;
        let shop_id = shop_record
            .id
            .ok_or_else(|| AppError::internal("Shop record without id"))?;
        Ok(self.live.subscribe(&shop_id.to_string()))
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn load_shop(&self, id: &str) -> AppResult<Shop> {
        match self.shops.find_by_id(id).await {
            Ok(Some(shop)) => Ok(shop),
            Ok(None) => Err(AppError::shop_not_found(id)),
            Err(crate::db::repository::RepoError::NotFound(_)) => {
                Err(AppError::shop_not_found(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_entry(&self, id: &str) -> AppResult<QueueEntry> {
        match self.entries.find_by_id(id).await {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => Err(AppError::entry_not_found(id)),
            Err(crate::db::repository::RepoError::NotFound(_)) => {
                Err(AppError::entry_not_found(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a worker ref, checking shop membership and availability
    async fn load_available_worker(&self, id: &str, shop: &RecordId) -> AppResult<RecordId> {
        let worker = match self.workers.find_by_id(id).await {
            Ok(Some(worker)) => worker,
            Ok(None) => {
                return Err(AppError::with_message(
                    ErrorCode::WorkerNotFound,
                    format!("Worker {id} not found"),
                ));
            }
            Err(crate::db::repository::RepoError::NotFound(_)) => {
                return Err(AppError::with_message(
                    ErrorCode::WorkerNotFound,
                    format!("Worker {id} not found"),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        if worker.shop != *shop {
            return Err(AppError::with_message(
                ErrorCode::WorkerNotFound,
                format!("Worker {id} does not belong to this shop"),
            ));
        }
        if !worker.available {
            return Err(AppError::with_message(
                ErrorCode::WorkerUnavailable,
                format!("Worker {} is not taking new entries", worker.name),
            ));
        }
        worker
            .id
            .ok_or_else(|| AppError::internal("Worker record without id"))
    }

    /// Generate a globally unique public code, retrying on collision
    async fn unique_code(&self) -> AppResult<String> {
        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = self.codes.next_code();
            if !self.entries.code_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!(attempt, "Public code collision, regenerating");
        }
        error!("Public code space exhausted after {MAX_ATTEMPTS} attempts");
        Err(AppError::new(ErrorCode::CodeSpaceExhausted))
    }

    /// Apply a status transition, enforcing the state machine
    ///
    /// The write is conditional on the status we checked: a concurrent
    /// writer who got there first makes it match nothing, and the
    /// transition fails instead of overwriting a terminal entry.
    async fn transition(&self, entry: QueueEntry, target: QueueStatus) -> AppResult<QueueEntry> {
        if !entry.status.can_transition_to(target) {
            return Err(AppError::invalid_transition(
                entry.status.to_string(),
                target.to_string(),
            ));
        }
        let entry_id = entry
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Entry record without id"))?;

        if target == QueueStatus::Completed {
            let history = HistoryRecord {
                id: None,
                entry: entry_id.clone(),
                shop: entry.shop.clone(),
                worker: entry.worker.clone(),
                user: entry.customer.user().map(str::to_string),
                services: entry.services.clone(),
                total_cost: entry.total_cost,
                completed_at: Utc::now(),
            };
            let committed = self
                .entries
                .complete(&entry_id, history, entry.worker.as_ref(), entry.status)
                .await?;
            if !committed {
                return Err(self.stale_transition(&entry_id, target).await);
            }
            self.load_entry(&entry_id.to_string()).await
        } else {
            match self
                .entries
                .set_status(&entry_id, target, entry.status)
                .await?
            {
                Some(updated) => Ok(updated),
                None => Err(self.stale_transition(&entry_id, target).await),
            }
        }
    }

    /// Report a lost transition race against the entry's current status
    async fn stale_transition(&self, id: &RecordId, target: QueueStatus) -> AppError {
        match self.load_entry(&id.to_string()).await {
            Ok(current) => {
                warn!(entry = %id, status = %current.status, "Status transition lost a race");
                AppError::invalid_transition(current.status.to_string(), target.to_string())
            }
            Err(e) => e,
        }
    }

    fn may_manage(entry: &QueueEntry, requester: &Requester) -> bool {
        match requester {
            Requester::Worker { worker } => entry
                .worker
                .as_ref()
                .map(|w| w.to_string() == *worker)
                .unwrap_or(false),
            Requester::Operator { shop } => entry.shop.to_string() == *shop,
            Requester::Customer { .. } => false,
        }
    }

    fn may_cancel(entry: &QueueEntry, requester: &Requester) -> bool {
        if Self::may_manage(entry, requester) {
            return true;
        }
        match requester {
            Requester::Customer { user } => entry.customer.user() == Some(user.as_str()),
            _ => false,
        }
    }

    /// Enqueue a push job for the entry's customer, if registered
    fn notify_customer(&self, entry: &QueueEntry, notification: shared::Notification) {
        if let Some(user) = entry.customer.user() {
            self.push.enqueue(user, notification);
        }
    }

    #[cfg(test)]
    pub(crate) fn partition_lock(
        &self,
        shop: &RecordId,
        worker: Option<RecordId>,
    ) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock_for(&PartitionKey::new(shop.clone(), worker))
    }

    /// Recompute and broadcast the shop's full snapshot off the request
    /// path
    fn publish_snapshot(&self, shop: RecordId) {
        let entries = self.entries.clone();
        let live = self.live.clone();
        tokio::spawn(async move {
            match entries.active_for_shop(&shop).await {
                Ok(active) => {
                    let summaries = active.iter().map(QueueEntry::summary).collect();
                    live.publish(&shop.to_string(), summaries);
                }
                Err(e) => warn!(shop = %shop, error = %e, "Failed to compute queue snapshot"),
            }
        });
    }
}
