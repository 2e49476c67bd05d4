//! Cost Resolver
//!
//! Prices a set of requested service lines against a shop's rate card.
//! Pure lookup and arithmetic; the resolved total is frozen onto the
//! entry at creation and never recomputed.

use crate::db::models::ShopService;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use shared::queue::ServiceLine;
use std::collections::HashMap;

pub struct CostResolver {
    prices: HashMap<String, Decimal>,
}

impl CostResolver {
    /// Build a resolver from the shop's active rate card
    pub fn new(rate_card: &[ShopService]) -> Self {
        let prices = rate_card
            .iter()
            .filter(|s| s.active)
            .map(|s| (s.id_string(), s.price))
            .collect();
        Self { prices }
    }

    /// Total cost of the requested lines: Σ(price × quantity)
    ///
    /// Fails on the first line referencing a service the shop does not
    /// currently offer.
    pub fn resolve(&self, services: &[ServiceLine]) -> AppResult<Decimal> {
        let mut total = Decimal::ZERO;
        for line in services {
            let price = self
                .prices
                .get(&line.service)
                .ok_or_else(|| AppError::unoffered_service(&line.service))?;
            total += *price * Decimal::from(line.quantity);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use surrealdb::RecordId;

    fn service(id: &str, price: &str, active: bool) -> ShopService {
        ShopService {
            id: Some(RecordId::from_table_key("shop_service", id)),
            shop: RecordId::from_table_key("shop", "s1"),
            name: id.to_string(),
            price: price.parse().unwrap(),
            active,
        }
    }

    #[test]
    fn test_resolve_total() {
        let resolver = CostResolver::new(&[
            service("cut", "15.50", true),
            service("shave", "8.00", true),
        ]);
        let total = resolver
            .resolve(&[
                ServiceLine::new("shop_service:cut", 2),
                ServiceLine::new("shop_service:shave", 1),
            ])
            .unwrap();
        assert_eq!(total, "39.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_unoffered_service_rejected() {
        let resolver = CostResolver::new(&[service("cut", "15.50", true)]);
        let err = resolver
            .resolve(&[ServiceLine::new("shop_service:massage", 1)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnofferedService);
    }

    #[test]
    fn test_inactive_service_is_unoffered() {
        let resolver = CostResolver::new(&[service("cut", "15.50", false)]);
        let err = resolver
            .resolve(&[ServiceLine::new("shop_service:cut", 1)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnofferedService);
    }

    #[test]
    fn test_empty_request_costs_zero() {
        // The manager rejects empty service lists before pricing;
        // the resolver itself just sums.
        let resolver = CostResolver::new(&[]);
        assert_eq!(resolver.resolve(&[]).unwrap(), Decimal::ZERO);
    }
}
