//! Database Module
//!
//! Embedded SurrealDB storage. Tables and indexes are defined at
//! startup; the unique index on `entry.public_code` is the hard
//! guarantee behind code uniqueness.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Schema and index definitions, applied idempotently at startup
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS entry SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS entry_public_code ON TABLE entry FIELDS public_code UNIQUE;
    DEFINE INDEX IF NOT EXISTS entry_partition ON TABLE entry FIELDS shop, worker, status;

    DEFINE TABLE IF NOT EXISTS history SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS history_entry ON TABLE history FIELDS entry;

    DEFINE TABLE IF NOT EXISTS shop SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS shop_service SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS shop_service_shop ON TABLE shop_service FIELDS shop;

    DEFINE TABLE IF NOT EXISTS worker SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS device_token SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS device_token_user ON TABLE device_token FIELDS user;
"#;

/// Database service — owns the embedded SurrealDB instance
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::prepare(db).await
    }

    /// In-memory database for tests
    #[cfg(test)]
    pub async fn memory() -> Result<Self, AppError> {
        use surrealdb::engine::local::Mem;

        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;

        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns("lineup")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready, schema defined");
        Ok(Self { db })
    }
}
