//! Navigation API
//!
//! GET /api/navigation - 按角色 / 权限过滤的菜单 + 未读通知数

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Navigation;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::navigation::menu_for;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/navigation", get(navigation))
}

pub async fn navigation(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> Json<Navigation> {
    Json(Navigation {
        role: current_user.role,
        items: menu_for(&current_user),
        unread: state.notifications.unread(current_user.id),
    })
}
