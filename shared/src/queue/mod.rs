//! Queue domain wire types

mod snapshot;
mod types;

pub use snapshot::{EntrySummary, QueueSnapshot};
pub use types::{Customer, QueueStatus, Requester, ServiceLine};
