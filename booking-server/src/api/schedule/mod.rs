//! Schedule block API 模块
//!
//! 专业人员封锁 / 解除自己的时段；管理员可指定 `professional_id`。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::permissions::STAFF;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/schedule", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/blocks",
            get(handler::list)
                .post(handler::create)
                .delete(handler::clear_day),
        )
        .route("/blocks/{id}", delete(handler::remove))
        .layer(middleware::from_fn(require_role(STAFF)))
}
