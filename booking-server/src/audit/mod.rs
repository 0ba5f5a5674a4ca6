//! 审计日志模块 — 防篡改审计追踪
//!
//! # 架构
//!
//! ```text
//! 敏感操作触发
//!   ├─ AuditService::log() → mpsc → AuditWorker → AuditStorage
//!   └─ AuditService::log_sync() → AuditStorage (启动/关闭场景)
//!
//! SHA256 哈希链: genesis → entry₁ → entry₂ → ... → entryₙ
//! ```
//!
//! - **Append-only**: 无删除/更新接口
//! - **链验证 API**: `GET /api/audit/verify` 可随时验证完整性

pub mod diff;
pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use diff::{create_delete_details, create_diff, create_snapshot};
pub use service::{AuditLogRequest, AuditService};
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditListResponse,
    AuditQuery,
};
pub use worker::AuditWorker;
