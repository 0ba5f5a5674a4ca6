//! 审计日志服务
//!
//! `AuditService` 是审计日志的核心服务，提供：
//! - 日志写入（通过 mpsc 通道异步接收）
//! - 日志查询 / 链验证（直接读取 storage）

use std::sync::Arc;
use tokio::sync::mpsc;

use super::storage::{AuditStorage, AuditStorageError};
use super::types::*;

/// 发送到 AuditService 的日志请求
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// 审计日志服务
///
/// 通过 mpsc 通道接收日志请求，由 [`AuditWorker`](super::AuditWorker) 异步写入。
/// `enabled = false` 时 `log` 直接丢弃请求（`ENABLE_AUDIT_LOG=false`）。
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditLogRequest>,
    enabled: bool,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("enabled", &self.enabled)
            .field("entries", &self.storage.len())
            .finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务，返回服务与 worker 需要消费的接收端
    pub fn new(
        storage: AuditStorage,
        buffer_size: usize,
        enabled: bool,
    ) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let service = Arc::new(Self {
            storage,
            tx,
            enabled,
        });
        (service, rx)
    }

    /// 异步记录审计日志（非阻塞）
    ///
    /// 通道满时等待（审计日志不允许丢失）。
    pub async fn log(
        &self,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) {
        if !self.enabled {
            return;
        }

        let req = AuditLogRequest {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            operator_id,
            operator_name,
            details,
        };

        if self.tx.send(req).await.is_err() {
            tracing::error!("Audit log channel closed, audit entry lost!");
        }
    }

    /// 直接写入审计日志（启动/关闭等无 worker 场景）
    pub fn log_sync(
        &self,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        details: serde_json::Value,
    ) -> Result<Option<AuditEntry>, AuditStorageError> {
        if !self.enabled {
            return Ok(None);
        }
        self.storage
            .append(
                action,
                resource_type.into(),
                resource_id.into(),
                None,
                None,
                details,
            )
            .map(Some)
    }

    /// 查询审计日志
    pub fn query(&self, q: &AuditQuery) -> AuditListResponse {
        let (items, total) = self.storage.query(q);
        AuditListResponse { items, total }
    }

    /// 验证审计链完整性
    pub fn verify_chain(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<AuditChainVerification, AuditStorageError> {
        self.storage.verify_chain(from, to)
    }

    /// 获取存储引用
    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditWorker;
    use serde_json::json;

    #[tokio::test]
    async fn log_goes_through_worker() {
        let storage = AuditStorage::new();
        let (service, rx) = AuditService::new(storage.clone(), 16, true);
        let worker = tokio::spawn(AuditWorker::new(storage.clone()).run(rx));

        service
            .log(
                AuditAction::LoginSuccess,
                "auth",
                "user:1",
                Some("1".into()),
                Some("Ana".into()),
                json!({}),
            )
            .await;
        drop(service);
        worker.await.unwrap();

        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn disabled_service_records_nothing() {
        let storage = AuditStorage::new();
        let (service, _rx) = AuditService::new(storage.clone(), 16, false);
        service
            .log(AuditAction::Logout, "auth", "user:1", None, None, json!({}))
            .await;
        assert!(service.log_sync(AuditAction::SystemStartup, "system", "server", json!({})).unwrap().is_none());
        assert!(storage.is_empty());
    }
}
