//! Database models
//!
//! Storage-level entities. Wire types live in `shared::queue`; the
//! conversion point is [`QueueEntry::summary`].

pub mod device_token;
pub mod entry;
pub mod history;
pub mod shop;
pub mod worker;

pub use device_token::DeviceToken;
pub use entry::QueueEntry;
pub use history::HistoryRecord;
pub use shop::{Shop, ShopService};
pub use worker::Worker;
