//! Waiting List API 模块
//!
//! 客户加入 / 查看 / 离开等候名单；管理员按日期查看。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::permissions::{CLIENTS, WAITING_LIST_MANAGE};
use crate::auth::{require_permission, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/waiting-list", routes())
}

fn routes() -> Router<ServerState> {
    let client_routes = Router::new()
        .route("/", post(handler::join))
        .route("/mine", get(handler::mine))
        .route("/{id}", delete(handler::leave))
        .layer(middleware::from_fn(require_role(CLIENTS)));

    let manage_routes = Router::new()
        .route("/", get(handler::list_by_date))
        .layer(middleware::from_fn(require_permission(WAITING_LIST_MANAGE)));

    client_routes.merge(manage_routes)
}
