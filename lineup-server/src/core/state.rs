use std::sync::Arc;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::db::repository::DeviceTokenRepository;
use crate::live::LiveFeed;
use crate::notify::{HttpPushTransport, NoopPushTransport, PushService, PushTransport};
use crate::queue::QueueManager;
use shared::error::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | 嵌入式数据库 |
/// | queue | Arc<QueueManager> | 排队核心 |
/// | live | Arc<LiveFeed> | 快照广播 |
/// | push | Arc<PushService> | 推送分发 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: DbService,
    /// 排队核心 - 所有队列变更的唯一入口
    pub queue: Arc<QueueManager>,
    /// 店铺快照广播
    pub live: Arc<LiveFeed>,
    /// 推送分发服务
    pub push: Arc<PushService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database)
    /// 3. 推送服务 (配置网关时走 HTTP，否则丢弃)
    /// 4. 排队核心
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_dir().join("lineup.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let transport: Arc<dyn PushTransport> = match &config.push_endpoint {
            Some(endpoint) => {
                tracing::info!(endpoint = %endpoint, "Push gateway configured");
                Arc::new(HttpPushTransport::new(
                    endpoint.clone(),
                    config.push_api_key.clone(),
                ))
            }
            None => {
                tracing::warn!("No push gateway configured, notifications will be discarded");
                Arc::new(NoopPushTransport)
            }
        };
        let push = Arc::new(PushService::new(
            config.push_queue_capacity,
            transport,
            DeviceTokenRepository::new(db.db.clone()),
        ));

        let live = Arc::new(LiveFeed::new());
        let queue = Arc::new(QueueManager::new(&db, push.clone(), live.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            queue,
            live,
            push,
        })
    }

    /// 启动后台任务（目前只有推送工作者）
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let push = self.push.clone();
        let cancel = tasks.shutdown_token();
        tasks.spawn("push_worker", TaskKind::Worker, async move {
            push.run(cancel).await;
        });
    }
}
