//! Lineup Server - 门店排队服务核心
//!
//! # 架构概述
//!
//! 本模块是排队节点的主入口，提供以下核心功能：
//!
//! - **排队核心** (`queue`): 位置分配、取号、状态机
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **推送** (`notify`): 尽力而为的变更通知
//! - **实时订阅** (`live`): 店铺级队列快照广播
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! lineup-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── queue/         # 排队核心 (分配、取号、状态机)
//! ├── notify/        # 推送分发
//! ├── live/          # 快照广播
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod live;
pub mod notify;
pub mod queue;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use queue::{CreateEntry, QueueManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    if config.is_production() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __    _
   / /   (_)___  ___  __  ______
  / /   / / __ \/ _ \/ / / / __ \
 / /___/ / / / /  __/ /_/ / /_/ /
/_____/_/_/ /_/\___/\__,_/ .___/
                        /_/
    "#
    );
}
