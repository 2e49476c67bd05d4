//! Queue Entry Repository
//!
//! Storage access for queue entries. Position reads and writes are only
//! correct under the partition lock held by the QueueManager; this layer
//! provides the primitives, not the serialization.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{HistoryRecord, QueueEntry};
use chrono::Utc;
use serde::Deserialize;
use shared::queue::QueueStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "entry";

/// Statuses that occupy a position in the live queue
const ACTIVE_STATUSES: &str = "['pending', 'in_progress']";

/// Thrown inside the completion transaction when the status guard
/// matches nothing, cancelling the whole transaction
const STALE_STATUS: &str = "entry_status_stale";

#[derive(Debug, Deserialize)]
struct MaxPositionRow {
    max_position: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct EntryRepository {
    base: BaseRepository,
}

impl EntryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new entry
    pub async fn create(&self, entry: QueueEntry) -> RepoResult<QueueEntry> {
        let created: Option<QueueEntry> = self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create entry".to_string()))
    }

    /// Find entry by id ("entry:…")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<QueueEntry>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid entry ID format: {}", id)))?;
        let entry: Option<QueueEntry> = self.base.db().select(record_id).await?;
        Ok(entry)
    }

    /// Find entry by its public code, any status
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<QueueEntry>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM entry WHERE public_code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let entries: Vec<QueueEntry> = result.take(0)?;
        Ok(entries.into_iter().next())
    }

    /// Whether a public code is already taken by any entry, any status
    pub async fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM entry WHERE public_code = $code GROUP ALL")
            .bind(("code", code.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count > 0).unwrap_or(false))
    }

    /// Highest position among active entries of a partition
    ///
    /// `None` when the partition has no active entries.
    pub async fn max_active_position(
        &self,
        shop: &RecordId,
        worker: Option<&RecordId>,
    ) -> RepoResult<Option<u32>> {
        let mut result = match worker {
            Some(worker) => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT math::max(position) AS max_position FROM entry \
                         WHERE shop = $shop AND worker = $worker AND status IN {ACTIVE_STATUSES} \
                         GROUP ALL"
                    ))
                    .bind(("shop", shop.clone()))
                    .bind(("worker", worker.clone()))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT math::max(position) AS max_position FROM entry \
                         WHERE shop = $shop AND worker IS NONE AND status IN {ACTIVE_STATUSES} \
                         GROUP ALL"
                    ))
                    .bind(("shop", shop.clone()))
                    .await?
            }
        };
        let rows: Vec<MaxPositionRow> = result.take(0)?;
        Ok(rows.into_iter().next().and_then(|r| r.max_position))
    }

    /// Active entries of one partition, ordered by position
    pub async fn active_in_partition(
        &self,
        shop: &RecordId,
        worker: Option<&RecordId>,
    ) -> RepoResult<Vec<QueueEntry>> {
        let mut result = match worker {
            Some(worker) => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT * FROM entry \
                         WHERE shop = $shop AND worker = $worker AND status IN {ACTIVE_STATUSES} \
                         ORDER BY position"
                    ))
                    .bind(("shop", shop.clone()))
                    .bind(("worker", worker.clone()))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT * FROM entry \
                         WHERE shop = $shop AND worker IS NONE AND status IN {ACTIVE_STATUSES} \
                         ORDER BY position"
                    ))
                    .bind(("shop", shop.clone()))
                    .await?
            }
        };
        let entries: Vec<QueueEntry> = result.take(0)?;
        Ok(entries)
    }

    /// Active entries across all partitions of a shop (live view)
    pub async fn active_for_shop(&self, shop: &RecordId) -> RepoResult<Vec<QueueEntry>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM entry \
                 WHERE shop = $shop AND status IN {ACTIVE_STATUSES} \
                 ORDER BY worker, position"
            ))
            .bind(("shop", shop.clone()))
            .await?;
        let entries: Vec<QueueEntry> = result.take(0)?;
        Ok(entries)
    }

    /// The active entry immediately behind `position` in the partition
    pub async fn next_active_above(
        &self,
        shop: &RecordId,
        worker: Option<&RecordId>,
        position: u32,
    ) -> RepoResult<Option<QueueEntry>> {
        let mut result = match worker {
            Some(worker) => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT * FROM entry \
                         WHERE shop = $shop AND worker = $worker AND status IN {ACTIVE_STATUSES} \
                         AND position > $position \
                         ORDER BY position LIMIT 1"
                    ))
                    .bind(("shop", shop.clone()))
                    .bind(("worker", worker.clone()))
                    .bind(("position", position))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(format!(
                        "SELECT * FROM entry \
                         WHERE shop = $shop AND worker IS NONE AND status IN {ACTIVE_STATUSES} \
                         AND position > $position \
                         ORDER BY position LIMIT 1"
                    ))
                    .bind(("shop", shop.clone()))
                    .bind(("position", position))
                    .await?
            }
        };
        let entries: Vec<QueueEntry> = result.take(0)?;
        Ok(entries.into_iter().next())
    }

    /// Update the status of an entry, guarded on its current status
    ///
    /// The write only lands while the entry is still in `expected`;
    /// `None` means a concurrent writer got there first.
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: QueueStatus,
        expected: QueueStatus,
    ) -> RepoResult<Option<QueueEntry>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $entry SET status = $status, updated_at = $now \
                 WHERE status = $expected",
            )
            .bind(("entry", id.clone()))
            .bind(("status", status))
            .bind(("expected", expected))
            .bind(("now", Utc::now()))
            .await?;
        let entries: Vec<QueueEntry> = result.take(0)?;
        Ok(entries.into_iter().next())
    }

    /// Swap the positions of two entries as a single transaction
    ///
    /// Both updates commit or neither does.
    pub async fn swap_positions(
        &self,
        a: &RecordId,
        a_position: u32,
        b: &RecordId,
        b_position: u32,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE $a SET position = $a_position, updated_at = $now; \
                 UPDATE $b SET position = $b_position, updated_at = $now; \
                 COMMIT TRANSACTION;",
            )
            .bind(("a", a.clone()))
            .bind(("a_position", a_position))
            .bind(("b", b.clone()))
            .bind(("b_position", b_position))
            .bind(("now", Utc::now()))
            .await?;
        Ok(())
    }

    /// Complete an entry: status update, history record and worker
    /// served-count in one transaction
    ///
    /// The status flip is guarded on `expected`; a stale guard throws
    /// inside the transaction so the history row and the served-count
    /// bump never land on their own. Returns whether the transaction
    /// committed — `false` means a concurrent writer changed the status
    /// first and nothing was written.
    pub async fn complete(
        &self,
        id: &RecordId,
        history: HistoryRecord,
        worker: Option<&RecordId>,
        expected: QueueStatus,
    ) -> RepoResult<bool> {
        let query = match worker {
            Some(_) => format!(
                "BEGIN TRANSACTION; \
                 LET $updated = UPDATE $entry SET status = 'completed', updated_at = $now \
                     WHERE status = $expected; \
                 IF array::len($updated) = 0 {{ THROW '{STALE_STATUS}' }}; \
                 CREATE history CONTENT $history; \
                 UPDATE $worker SET served_count += 1; \
                 COMMIT TRANSACTION;"
            ),
            None => format!(
                "BEGIN TRANSACTION; \
                 LET $updated = UPDATE $entry SET status = 'completed', updated_at = $now \
                     WHERE status = $expected; \
                 IF array::len($updated) = 0 {{ THROW '{STALE_STATUS}' }}; \
                 CREATE history CONTENT $history; \
                 COMMIT TRANSACTION;"
            ),
        };

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("entry", id.clone()))
            .bind(("expected", expected))
            .bind(("history", history))
            .bind(("now", Utc::now()));
        if let Some(worker) = worker {
            request = request.bind(("worker", worker.clone()));
        }
        let result = request.await?;
        match result.check() {
            Ok(_) => Ok(true),
            Err(e) => {
                // A cancelled transaction reports the throw on one
                // statement and "not executed" on the rest
                let reason = e.to_string();
                if reason.contains(STALE_STATUS) || reason.contains("not executed") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }
}
