//! History Repository
//!
//! Read-only from the service side; history rows are created inside the
//! completion transaction in the entry repository.

use super::{BaseRepository, RepoResult};
use crate::db::models::HistoryRecord;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct HistoryRepository {
    base: BaseRepository,
}

impl HistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All history rows for an entry (at most one under normal operation)
    pub async fn find_by_entry(&self, entry: &RecordId) -> RepoResult<Vec<HistoryRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM history WHERE entry = $entry")
            .bind(("entry", entry.clone()))
            .await?;
        let records: Vec<HistoryRecord> = result.take(0)?;
        Ok(records)
    }
}
