//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/health | GET | 简单健康检查 | 无 |
//! | /api/health/detailed | GET | 详细健康检查 | 管理员 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "epoch": "5c0f..."
//! }
//! ```

use axum::{Json, Router, extract::State, middleware, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::auth::require_admin;
use crate::core::ServerState;

/// 健康检查路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/health/detailed",
            get(detailed_health).layer(middleware::from_fn(require_admin)),
        )
}

/// 简单健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 实例 epoch
    epoch: String,
}

/// 详细健康检查响应
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 各组件检查结果
    checks: HealthChecks,
}

/// 健康检查详情
#[derive(Serialize)]
pub struct HealthChecks {
    /// 数据存储 (各表记录数)
    store: StoreCounts,
    /// 消息总线订阅者数量
    message_bus_receivers: usize,
    /// 审计日志条目数
    audit_entries: usize,
}

#[derive(Serialize)]
pub struct StoreCounts {
    users: usize,
    professionals: usize,
    services: usize,
    products: usize,
    appointments: usize,
    blocks: usize,
    waiting_list: usize,
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET /api/health - 简单健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let _ = get_uptime_seconds();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.epoch.clone(),
    })
}

/// GET /api/health/detailed - 详细健康检查
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let store = &state.store;
    Json(DetailedHealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks {
            store: StoreCounts {
                users: store.users.len(),
                professionals: store.professionals.len(),
                services: store.services.len(),
                products: store.products.len(),
                appointments: store.appointments.len(),
                blocks: store.blocks.len(),
                waiting_list: store.waiting_list.len(),
            },
            message_bus_receivers: state.message_bus.receiver_count(),
            audit_entries: state.audit_service.storage().len(),
        },
    })
}
