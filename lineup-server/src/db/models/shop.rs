//! Shop and rate card models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Shop entity
///
/// Identity, catalog management and discovery live in external systems;
/// the queue core only needs the operator ref and whether walk-ins are
/// currently accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// External user ref of the shop operator
    pub operator: String,
    /// Whether the shop is currently accepting walk-ins
    pub open: bool,
}

/// One rate card line: a service the shop offers at its current price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub shop: RecordId,
    pub name: String,
    pub price: Decimal,
    pub active: bool,
}

impl ShopService {
    /// Service id as a "shop_service:…" string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
