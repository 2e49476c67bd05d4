//! Shared types for the Lineup framework
//!
//! Common types used by the server and its clients: error codes and
//! response structures, queue wire types, and the push notification
//! payload contract.

pub mod error;
pub mod notification;
pub mod queue;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use notification::Notification;
pub use queue::{Customer, QueueSnapshot, QueueStatus, Requester, ServiceLine};
