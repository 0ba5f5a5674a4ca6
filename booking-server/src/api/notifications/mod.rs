//! Notification API 模块
//!
//! - GET  /api/notifications        未读数 + 最后一条通知
//! - POST /api/notifications/read   标记已读
//! - GET  /api/notifications/stream SSE 实时推送

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::summary))
        .route("/read", post(handler::mark_read))
        .route("/stream", get(handler::stream))
}
