//! Device Token Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::DeviceToken;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "device_token";

#[derive(Clone)]
pub struct DeviceTokenRepository {
    base: BaseRepository,
}

impl DeviceTokenRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Register a device token for a user
    pub async fn register(&self, token: DeviceToken) -> RepoResult<DeviceToken> {
        let created: Option<DeviceToken> = self.base.db().create(TABLE).content(token).await?;
        created.ok_or_else(|| RepoError::Database("Failed to register device token".to_string()))
    }

    /// All tokens registered for a user, possibly empty
    pub async fn tokens_for_user(&self, user: &str) -> RepoResult<Vec<DeviceToken>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM device_token WHERE user = $user")
            .bind(("user", user.to_string()))
            .await?;
        let tokens: Vec<DeviceToken> = result.take(0)?;
        Ok(tokens)
    }
}
