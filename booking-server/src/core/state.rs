use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use shared::message::{BookingEvent, BusMessage, SyncPayload};
use shared::models::SyncStatus;
use tokio::sync::mpsc;

use crate::audit::{AuditAction, AuditLogRequest, AuditService, AuditStorage, AuditWorker};
use crate::auth::JwtService;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::message::MessageBus;
use crate::notifications::NotificationCenter;
use crate::store::{Store, seed_demo_data};

/// 审计通道缓冲区大小
const AUDIT_BUFFER_SIZE: usize = 1024;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// # 使用场景
///
/// 用于 broadcast_sync 时自动生成递增的版本号，
/// 确保客户端可以通过版本号判断数据新旧。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源版本的快照
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<Store> | 内存数据存储 |
/// | message_bus | MessageBus | 进程内消息总线 |
/// | audit_service | Arc<AuditService> | 审计日志 |
/// | notifications | Arc<NotificationCenter> | 通知中心 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
/// | epoch | String | 实例 epoch (启动时生成) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 内存数据存储
    pub store: Arc<Store>,
    /// 消息总线
    pub message_bus: MessageBus,
    /// 审计日志服务
    pub audit_service: Arc<AuditService>,
    /// 通知中心
    pub notifications: Arc<NotificationCenter>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 资源版本管理器 (用于 broadcast_sync 自动递增版本号)
    pub resource_versions: Arc<ResourceVersions>,
    /// 服务器实例 epoch，客户端据此检测重启
    pub epoch: String,
    /// 审计 worker 的接收端，启动后台任务时取走
    audit_rx: Arc<Mutex<Option<mpsc::Receiver<AuditLogRequest>>>>,
}

impl ServerState {
    /// 创建服务器状态 (不填充数据)
    pub fn new(config: Config) -> Self {
        let store = Arc::new(Store::new());
        let message_bus = MessageBus::new();
        let (audit_service, audit_rx) =
            AuditService::new(AuditStorage::new(), AUDIT_BUFFER_SIZE, config.enable_audit_log);
        let notifications = Arc::new(NotificationCenter::new(store.clone(), message_bus.clone()));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            store,
            message_bus,
            audit_service,
            notifications,
            jwt_service,
            resource_versions: Arc::new(ResourceVersions::new()),
            epoch: uuid::Uuid::new_v4().to_string(),
            audit_rx: Arc::new(Mutex::new(Some(audit_rx))),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 各服务 (Store, MessageBus, Audit, Notifications, JWT)
    /// 3. 演示数据 (`SEED_DEMO_DATA`)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let state = Self::new(config.clone());

        if config.seed_demo_data {
            seed_demo_data(&state.store, &config.demo_password).await?;
        }

        if let Err(e) = state.audit_service.log_sync(
            AuditAction::SystemStartup,
            "system",
            "server",
            serde_json::json!({
                "epoch": &state.epoch,
                "environment": &config.environment,
            }),
        ) {
            tracing::error!(error = %e, "Failed to record startup audit entry");
        }

        Ok(state)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 审计日志 worker (AuditWorker)
    /// - 通知中心 (NotificationCenter)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        match self.audit_rx.lock().take() {
            Some(rx) => {
                let worker = AuditWorker::new(self.audit_service.storage().clone());
                let token = tasks.shutdown_token();
                tasks.spawn("audit_worker", TaskKind::Worker, async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = worker.run(rx) => {}
                    }
                });
            }
            None => tracing::warn!("Audit worker already started"),
        }

        let center = self.notifications.clone();
        let rx = self.message_bus.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn(
            "notification_center",
            TaskKind::Listener,
            center.run(rx, token),
        );

        tasks.log_summary();
        tasks
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取消息总线
    pub fn message_bus(&self) -> &MessageBus {
        &self.message_bus
    }

    /// 发布预约事件 (由通知中心消费)
    pub fn publish_event(&self, event: &BookingEvent) {
        let result = BusMessage::booking(event)
            .map_err(|e| crate::AppError::internal(e.to_string()))
            .and_then(|msg| self.message_bus.publish(msg));
        if let Err(e) = result {
            tracing::warn!(event = event.name(), error = %e, "Failed to publish booking event");
        }
    }

    /// 广播同步消息
    ///
    /// 向所有连接的客户端广播资源变更通知。
    /// 版本号由 ResourceVersions 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "service", "appointment")
    /// - `action`: 变更类型 ("created", "updated", "deleted")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: impl ToString,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        match BusMessage::sync(&payload) {
            Ok(msg) => {
                let _ = self.message_bus.publish(msg);
            }
            Err(e) => tracing::warn!(resource, error = %e, "Failed to encode sync payload"),
        }
    }

    /// 同步状态 (epoch + 各资源版本)
    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            epoch: self.epoch.clone(),
            versions: self.resource_versions.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.increment("service"), 1);
        assert_eq!(versions.increment("service"), 2);
        assert_eq!(versions.increment("product"), 1);
        assert_eq!(versions.get("service"), 2);
        assert_eq!(versions.get("branch"), 0);
        assert_eq!(versions.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn broadcast_sync_bumps_version() {
        let state = ServerState::new(Config::with_overrides("/tmp/booking-test", 0));
        let mut rx = state.message_bus.subscribe();
        state
            .broadcast_sync("service", "created", 7, Some(&serde_json::json!({"id": 7})))
            .await;

        let msg = rx.recv().await.unwrap();
        let payload: SyncPayload = msg.parse_payload().unwrap();
        assert_eq!(payload.version, 1);
        assert_eq!(payload.id, "7");
        assert_eq!(state.sync_status().versions.get("service"), Some(&1));
    }
}
