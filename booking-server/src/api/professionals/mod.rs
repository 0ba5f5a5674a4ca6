//! Professional API 模块
//!
//! - 列表 / 详情 / 可用时段: 所有已登录用户 (预约时使用)
//! - `me/schedule`: 专业人员维护自己的每周排班
//! - 创建 / 更新 / 删除: `professionals:manage`

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{PROFESSIONALS, PROFESSIONALS_MANAGE};
use crate::auth::{require_permission, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/professionals", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/availability", get(handler::availability));

    let own_routes = Router::new()
        .route(
            "/me/schedule",
            get(handler::my_schedule).put(handler::update_my_schedule),
        )
        .layer(middleware::from_fn(require_role(PROFESSIONALS)));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission(PROFESSIONALS_MANAGE)));

    read_routes.merge(own_routes).merge(manage_routes)
}
