//! QueueManager test support
//!
//! Every test runs against an in-memory database with one seeded shop,
//! one available worker and a two-line rate card.

mod test_effects;
mod test_lifecycle;
mod test_ordering;

use crate::db::DbService;
use crate::db::models::{DeviceToken, Shop, ShopService, Worker};
use crate::db::repository::{DeviceTokenRepository, ShopRepository, WorkerRepository};
use crate::live::LiveFeed;
use crate::notify::{MemoryPushTransport, PushService};
use crate::queue::code::{CodeSource, RandomCodeSource};
use crate::queue::manager::{CreateEntry, QueueManager};
use shared::queue::{Customer, Requester, ServiceLine};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) const OPERATOR: &str = "user:boss";
pub(crate) const REGISTERED_USER: &str = "user:ana";

pub(crate) struct TestQueue {
    pub manager: Arc<QueueManager>,
    pub transport: Arc<MemoryPushTransport>,
    pub db: DbService,
    /// Seeded ids, "table:id" strings
    pub shop: String,
    pub worker: String,
    pub cut: String,
    pub shave: String,
}

impl TestQueue {
    pub async fn new() -> Self {
        Self::with_code_source(Arc::new(RandomCodeSource)).await
    }

    pub async fn with_code_source(codes: Arc<dyn CodeSource>) -> Self {
        let db = DbService::memory().await.unwrap();

        let shops = ShopRepository::new(db.db.clone());
        let shop = shops
            .create(Shop {
                id: None,
                name: "Corner Barbers".to_string(),
                operator: OPERATOR.to_string(),
                open: true,
            })
            .await
            .unwrap();
        let shop_id = shop.id.clone().unwrap();

        let cut = shops
            .add_service(ShopService {
                id: None,
                shop: shop_id.clone(),
                name: "Haircut".to_string(),
                price: "15.50".parse().unwrap(),
                active: true,
            })
            .await
            .unwrap();
        let shave = shops
            .add_service(ShopService {
                id: None,
                shop: shop_id.clone(),
                name: "Shave".to_string(),
                price: "8.00".parse().unwrap(),
                active: true,
            })
            .await
            .unwrap();

        let workers = WorkerRepository::new(db.db.clone());
        let worker = workers
            .create(Worker {
                id: None,
                shop: shop_id.clone(),
                name: "Marco".to_string(),
                user: None,
                available: true,
                served_count: 0,
            })
            .await
            .unwrap();

        let tokens = DeviceTokenRepository::new(db.db.clone());
        tokens
            .register(DeviceToken {
                id: None,
                user: REGISTERED_USER.to_string(),
                token: "device-token-ana".to_string(),
                platform: "ios".to_string(),
            })
            .await
            .unwrap();

        let transport = Arc::new(MemoryPushTransport::new());
        let push = Arc::new(PushService::new(
            64,
            transport.clone(),
            DeviceTokenRepository::new(db.db.clone()),
        ));
        let cancel = CancellationToken::new();
        {
            let push = push.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { push.run(cancel).await });
        }

        let live = Arc::new(LiveFeed::new());
        let manager = Arc::new(QueueManager::with_code_source(&db, push, live.clone(), codes));

        Self {
            manager,
            transport,
            db,
            shop: shop_id.to_string(),
            worker: worker.id.unwrap().to_string(),
            cut: cut.id_string(),
            shave: shave.id_string(),
        }
    }

    /// Create request targeting the seeded worker's queue
    pub fn request(&self, customer: Customer) -> CreateEntry {
        CreateEntry {
            shop: self.shop.clone(),
            worker: Some(self.worker.clone()),
            customer,
            services: vec![ServiceLine::new(self.cut.clone(), 1)],
        }
    }

    pub fn as_worker(&self) -> Requester {
        Requester::Worker {
            worker: self.worker.clone(),
        }
    }

    pub fn as_operator(&self) -> Requester {
        Requester::Operator {
            shop: self.shop.clone(),
        }
    }

    /// Wait until the transport has seen at least `n` deliveries
    pub async fn wait_for_pushes(&self, n: usize) -> Vec<(String, shared::Notification)> {
        for _ in 0..200 {
            let delivered = self.transport.delivered();
            if delivered.len() >= n {
                return delivered;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "timed out waiting for {} pushes, saw {:?}",
            n,
            self.transport.delivered()
        );
    }
}

/// Deterministic code source: yields the scripted codes in order, then
/// repeats the last one forever
pub(crate) struct ScriptedCodes {
    codes: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedCodes {
    pub fn new(codes: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// How many codes were handed out
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl CodeSource for ScriptedCodes {
    fn next_code(&self) -> String {
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.codes[i.min(self.codes.len() - 1)].clone()
    }
}

pub(crate) fn guest(name: &str) -> Customer {
    Customer::Guest {
        name: name.to_string(),
        phone: "+34600111222".to_string(),
    }
}

pub(crate) fn registered() -> Customer {
    Customer::Registered {
        user: REGISTERED_USER.to_string(),
    }
}

pub(crate) fn as_customer(user: &str) -> Requester {
    Requester::Customer {
        user: user.to_string(),
    }
}
