//! Profile API 模块
//!
//! 当前用户的资料、通知偏好、密码和头像

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/profile", routes())
}

fn routes() -> Router<ServerState> {
    // 仅需登录；只能操作自己的资料
    Router::new()
        .route("/", get(handler::get).put(handler::update))
        .route("/preferences", put(handler::update_preferences))
        .route("/password", put(handler::change_password))
        .route("/avatar", post(handler::upload_avatar))
}
