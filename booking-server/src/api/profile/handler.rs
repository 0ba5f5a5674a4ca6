//! Profile API Handlers

use axum::{
    Json,
    extract::{Extension, Multipart, State},
};
use shared::client::UserInfo;
use shared::models::{PasswordChange, Preferences, PreferencesUpdate, ProfileUpdate, User};

use crate::api::upload::{process_image, read_file_field};
use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::core::ServerState;
use crate::store::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "user";

fn info_of(user: &User, current_user: &CurrentUser) -> UserInfo {
    UserInfo::from_user(user, current_user.professional_id)
}

/// GET /api/profile - 当前用户资料
pub async fn get(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let u = state.store.users.require(current_user.id).await?;
    Ok(Json(info_of(&u, &current_user)))
}

/// PUT /api/profile - 更新姓名 / 邮箱 / 电话
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<UserInfo>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email.trim())?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let u = user::update_profile(&state.store, current_user.id, payload).await?;

    state
        .broadcast_sync::<()>(RESOURCE, "updated", u.id, None)
        .await;

    Ok(Json(info_of(&u, &current_user)))
}

/// PUT /api/profile/preferences - 部分更新通知偏好，返回存储后的值
pub async fn update_preferences(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PreferencesUpdate>,
) -> AppResult<Json<Preferences>> {
    let u = state
        .store
        .users
        .modify(current_user.id, |u| {
            payload.apply_to(&mut u.preferences);
            Ok(())
        })
        .await?;

    tracing::debug!(user_id = u.id, preferences = ?u.preferences, "Preferences updated");

    Ok(Json(u.preferences))
}

/// PUT /api/profile/password - 修改密码 (需验证当前密码)
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PasswordChange>,
) -> AppResult<Json<bool>> {
    validate_password(&payload.new_password)?;

    let u = state.store.users.require(current_user.id).await?;
    let valid = verify_password(&payload.current_password, &u.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(AppError::invalid_credentials());
    }

    let hash = hash_password(&payload.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    state
        .store
        .users
        .modify(current_user.id, |u| {
            u.password_hash = hash;
            Ok(())
        })
        .await?;

    audit_log!(
        state.audit_service,
        AuditAction::PasswordChanged,
        RESOURCE, current_user.id.to_string(),
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = serde_json::json!({})
    );

    Ok(Json(true))
}

/// POST /api/profile/avatar - 上传头像 (multipart `file`)
pub async fn upload_avatar(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<UserInfo>> {
    let (data, filename) = read_file_field(&mut multipart).await?;
    let processed = tokio::task::spawn_blocking(move || process_image(&data, &filename))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))??;

    let u = state
        .store
        .users
        .modify(current_user.id, |u| {
            u.avatar = Some(processed.data_url);
            Ok(())
        })
        .await?;

    state
        .broadcast_sync::<()>(RESOURCE, "updated", u.id, None)
        .await;

    Ok(Json(info_of(&u, &current_user)))
}
