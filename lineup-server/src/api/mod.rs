//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`entries`] - 排队条目的创建与变更
//! - [`queue`] - 队列视图与实时订阅

pub mod entries;
pub mod health;
pub mod queue;

// Re-export common types for handlers
pub use shared::error::{AppError, AppResult};
