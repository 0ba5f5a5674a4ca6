//! Appointment API 模块
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/appointments/mine | GET | 客户 |
//! | /api/appointments | POST | 客户 |
//! | /api/appointments/{id} | GET | 客户本人 / 专业人员本人 / 管理员 |
//! | /api/appointments/{id}/cancel | POST | 客户 |
//! | /api/appointments/{id}/rate | POST | 客户 |
//! | /api/appointments/{id}/status | PUT | 专业人员 / 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{CLIENTS, STAFF};
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/appointments", routes())
}

fn routes() -> Router<ServerState> {
    let client_routes = Router::new()
        .route("/", post(handler::book))
        .route("/mine", get(handler::mine))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/rate", post(handler::rate))
        .layer(middleware::from_fn(require_role(CLIENTS)));

    let staff_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_role(STAFF)));

    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .merge(client_routes)
        .merge(staff_routes)
}
