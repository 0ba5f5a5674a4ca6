//! Branch API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{Branch, BranchCreate, BranchUpdate};

use crate::audit::{AuditAction, create_delete_details, create_diff, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::store::repository::branch;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

const RESOURCE: &str = "branch";

/// GET /api/branches
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Branch>>> {
    let mut branches = state.store.branches.list().await;
    branches.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(branches))
}

/// GET /api/branches/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Branch>> {
    Ok(Json(state.store.branches.require(id).await?))
}

/// POST /api/branches
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BranchCreate>,
) -> AppResult<Json<Branch>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let b = branch::create(&state.store, payload).await?;
    let id = b.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::BranchCreated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_snapshot(&b, RESOURCE)
    );

    state.broadcast_sync(RESOURCE, "created", &id, Some(&b)).await;

    Ok(Json(b))
}

/// PUT /api/branches/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<BranchUpdate>,
) -> AppResult<Json<Branch>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(address) = &payload.address {
        validate_required_text(address, "address", MAX_ADDRESS_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let before = state.store.branches.require(id).await?;
    let b = branch::update(&state.store, id, payload).await?;
    let id = b.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::BranchUpdated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before, &b, RESOURCE)
    );

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&b)).await;

    Ok(Json(b))
}

/// DELETE /api/branches/:id - 被排班引用时拒绝
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let b = branch::delete(&state.store, id).await?;
    let id = b.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::BranchDeleted,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_delete_details(&b.name)
    );

    state.broadcast_sync::<()>(RESOURCE, "deleted", &id, None).await;

    Ok(Json(true))
}
