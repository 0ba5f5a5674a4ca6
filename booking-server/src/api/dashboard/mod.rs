//! Professional dashboard API 模块
//!
//! 专业人员查看自己的日程；管理员可通过 `professional_id` 查看任何人。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::STAFF;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::day))
        .route("/range", get(handler::range))
        .layer(middleware::from_fn(require_role(STAFF)))
}
