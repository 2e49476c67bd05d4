//! Shop Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Shop, ShopService};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "shop";
const SERVICE_TABLE: &str = "shop_service";

#[derive(Clone)]
pub struct ShopRepository {
    base: BaseRepository,
}

impl ShopRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, shop: Shop) -> RepoResult<Shop> {
        let created: Option<Shop> = self.base.db().create(TABLE).content(shop).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create shop".to_string()))
    }

    /// Find shop by id ("shop:…")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Shop>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid shop ID format: {}", id)))?;
        let shop: Option<Shop> = self.base.db().select(record_id).await?;
        Ok(shop)
    }

    /// All active rate-card lines of a shop
    pub async fn rate_card(&self, shop: &RecordId) -> RepoResult<Vec<ShopService>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM shop_service WHERE shop = $shop AND active = true")
            .bind(("shop", shop.clone()))
            .await?;
        let services: Vec<ShopService> = result.take(0)?;
        Ok(services)
    }

    pub async fn add_service(&self, service: ShopService) -> RepoResult<ShopService> {
        let created: Option<ShopService> =
            self.base.db().create(SERVICE_TABLE).content(service).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create shop service".to_string()))
    }

    /// Toggle whether the shop accepts new entries
    pub async fn set_open(&self, shop: &RecordId, open: bool) -> RepoResult<Shop> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $shop SET open = $open")
            .bind(("shop", shop.clone()))
            .bind(("open", open))
            .await?;
        let shops: Vec<Shop> = result.take(0)?;
        shops
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Shop {} not found", shop)))
    }
}
