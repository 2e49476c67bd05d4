//! Queue Core
//!
//! Position allocation, pricing, public codes and the mutation
//! orchestrator.

pub mod code;
pub mod cost;
pub mod manager;
pub mod partition;

pub use manager::{CreateEntry, QueueManager};
