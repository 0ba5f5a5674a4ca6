//! Sync API 模块

use axum::{Json, Router, extract::State, routing::get};
use shared::models::SyncStatus;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 同步状态：无需权限检查（基础操作）
    Router::new().route("/api/sync/status", get(get_sync_status))
}

/// GET /api/sync/status - 获取同步状态
///
/// 返回服务器 epoch 和各资源类型的当前版本号，
/// 客户端重连时调用此接口检查是否需要刷新
pub async fn get_sync_status(State(state): State<ServerState>) -> Json<SyncStatus> {
    Json(state.sync_status())
}
