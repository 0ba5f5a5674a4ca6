//! User Management Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Role, User, UserCreate, UserUpdate};

use crate::audit::{AuditAction, create_diff, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::auth::permissions::is_valid_permission;
use crate::core::ServerState;
use crate::store::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "user";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<Role>,
}

/// GET /api/users?role= - 用户列表 (按姓名排序)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let mut users = state
        .store
        .users
        .filter(|u| query.role.is_none_or(|r| u.role == r))
        .await;
    users.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(users))
}

fn validate_permissions(permissions: &[String]) -> AppResult<()> {
    match permissions.iter().find(|p| !is_valid_permission(p)) {
        Some(bad) => Err(AppError::validation(format!("Unknown permission: {}", bad))),
        None => Ok(()),
    }
}

fn validate_create(payload: &UserCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(payload.email.trim())?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_password(&payload.password)?;
    validate_permissions(&payload.permissions)
}

/// POST /api/users - 创建账号 (员工 / 客户)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_create(&payload)?;

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    let created = user::create(&state.store, payload, hash).await?;
    let id = created.id;

    audit_log!(
        state.audit_service,
        AuditAction::UserCreated,
        RESOURCE, id.to_string(),
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_snapshot(&created, RESOURCE)
    );

    state
        .broadcast_sync::<()>(RESOURCE, "created", id, None)
        .await;

    Ok(Json(created))
}

fn validate_update(current_user: &CurrentUser, id: i64, payload: &UserUpdate) -> AppResult<()> {
    if id == current_user.id {
        let demotes = payload.role.is_some_and(|r| r != current_user.role);
        let deactivates = payload.is_active == Some(false);
        if demotes || deactivates {
            return Err(AppError::new(ErrorCode::CannotModifySelf));
        }
    }
    match &payload.permissions {
        Some(permissions) => validate_permissions(permissions),
        None => Ok(()),
    }
}

/// PUT /api/users/:id - 修改角色 / 权限 / 启用状态
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    validate_update(&current_user, id, &payload)?;

    let before = state.store.users.require(id).await?;
    let updated = user::update_access(&state.store, id, payload).await?;

    audit_log!(
        state.audit_service,
        AuditAction::UserUpdated,
        RESOURCE, id.to_string(),
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before, &updated, RESOURCE)
    );

    state
        .broadcast_sync::<()>(RESOURCE, "updated", id, None)
        .await;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Admin".into(),
            role: Role::Admin,
            permissions: vec!["all".into()],
            professional_id: None,
        }
    }

    #[test]
    fn admin_cannot_demote_or_deactivate_self() {
        let demote = UserUpdate {
            role: Some(Role::Client),
            ..Default::default()
        };
        let err = validate_update(&admin(), 1, &demote).unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotModifySelf);

        let deactivate = UserUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(validate_update(&admin(), 1, &deactivate).is_err());

        // 对他人操作不受限
        assert!(validate_update(&admin(), 2, &demote).is_ok());
    }

    #[test]
    fn create_requires_strong_password_and_known_permissions() {
        let mut payload = UserCreate {
            name: "Paula".into(),
            email: "paula@salon.local".into(),
            phone: None,
            password: "short".into(),
            role: Role::Professional,
            permissions: vec![],
        };
        assert!(validate_create(&payload).is_err());

        payload.password = "long-enough-secret".into();
        assert!(validate_create(&payload).is_ok());

        payload.permissions = vec!["root".into()];
        assert!(validate_create(&payload).is_err());
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let update = UserUpdate {
            permissions: Some(vec!["services:manage".into(), "root".into()]),
            ..Default::default()
        };
        assert!(validate_update(&admin(), 2, &update).is_err());
    }
}
