//! Notification Module
//!
//! Best-effort push notifications for queue mutations. Delivery is
//! decoupled from the mutation path through a bounded channel.

pub mod dispatcher;
pub mod messages;
pub mod transport;

pub use dispatcher::{PushJob, PushService};
pub use transport::{HttpPushTransport, MemoryPushTransport, NoopPushTransport, PushTransport};
