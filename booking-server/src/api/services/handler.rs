//! Service API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::models::{LoyaltyConfig, Service, ServiceCreate, ServiceUpdate};

use crate::audit::{AuditAction, create_delete_details, create_diff, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::permissions::SERVICES_MANAGE;
use crate::core::ServerState;
use crate::store::repository::service;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_duration, validate_optional_text,
    validate_percent, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "service";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Include deactivated services (managers only)
    #[serde(default)]
    pub include_inactive: bool,
}

fn validate_loyalty(loyalty: &LoyaltyConfig) -> AppResult<()> {
    if loyalty.enabled && loyalty.visits_for_reward < 1 {
        return Err(AppError::validation(
            "loyalty.visits_for_reward must be at least 1 when loyalty is enabled",
        ));
    }
    Ok(())
}

fn validate_create(payload: &ServiceCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_price(payload.price, "price")?;
    validate_duration(payload.duration_minutes)?;
    validate_percent(payload.commission, "commission")?;
    if let Some(loyalty) = &payload.loyalty {
        validate_loyalty(loyalty)?;
    }
    Ok(())
}

fn validate_update(payload: &ServiceUpdate) -> AppResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(duration) = payload.duration_minutes {
        validate_duration(duration)?;
    }
    if let Some(commission) = payload.commission {
        validate_percent(commission, "commission")?;
    }
    if let Some(loyalty) = &payload.loyalty {
        validate_loyalty(loyalty)?;
    }
    Ok(())
}

/// GET /api/services - 服务列表 (管理者可包含停用服务)
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let include_inactive = query.include_inactive && current_user.has_permission(SERVICES_MANAGE);
    let services = service::find_all(&state.store, include_inactive).await;
    Ok(Json(services))
}

/// GET /api/services/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Service>> {
    let svc = state.store.services.require(id).await?;
    if !svc.is_active && !current_user.has_permission(SERVICES_MANAGE) {
        return Err(AppError::not_found_with(ErrorCode::ServiceNotFound, id));
    }
    Ok(Json(svc))
}

/// POST /api/services - 创建服务
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    validate_create(&payload)?;

    let svc = service::create(&state.store, payload).await?;
    let id = svc.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ServiceCreated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_snapshot(&svc, RESOURCE)
    );

    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&svc))
        .await;

    Ok(Json(svc))
}

/// PUT /api/services/:id - 更新服务
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceUpdate>,
) -> AppResult<Json<Service>> {
    validate_update(&payload)?;

    let (before, svc) = service::update(&state.store, id, payload).await?;
    let id = svc.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ServiceUpdated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before, &svc, RESOURCE)
    );

    if before.price != svc.price {
        audit_log!(
            state.audit_service,
            AuditAction::ServicePriceChanged,
            RESOURCE, &id,
            operator_id = Some(current_user.id.to_string()),
            operator_name = Some(current_user.name.clone()),
            details = serde_json::json!({
                "name": &svc.name,
                "from": before.price,
                "to": svc.price,
            })
        );
    }

    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&svc))
        .await;

    Ok(Json(svc))
}

/// DELETE /api/services/:id - 删除服务 (有待处理预约时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let svc = service::delete(&state.store, id).await?;
    let id = svc.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ServiceDeleted,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_delete_details(&svc.name)
    );

    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id, None)
        .await;

    Ok(Json(true))
}
