//! Worker Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Worker;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "worker";

#[derive(Clone)]
pub struct WorkerRepository {
    base: BaseRepository,
}

impl WorkerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, worker: Worker) -> RepoResult<Worker> {
        let created: Option<Worker> = self.base.db().create(TABLE).content(worker).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create worker".to_string()))
    }

    /// Find worker by id ("worker:…")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Worker>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid worker ID format: {}", id)))?;
        let worker: Option<Worker> = self.base.db().select(record_id).await?;
        Ok(worker)
    }

    pub async fn set_available(&self, worker: &RecordId, available: bool) -> RepoResult<Worker> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $worker SET available = $available")
            .bind(("worker", worker.clone()))
            .bind(("available", available))
            .await?;
        let workers: Vec<Worker> = result.take(0)?;
        workers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Worker {} not found", worker)))
    }
}
