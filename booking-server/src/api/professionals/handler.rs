//! Professional API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Professional, ProfessionalCreate, ProfessionalUpdate, Role, WeeklySchedule};

use crate::audit::{AuditAction, create_delete_details, create_diff, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::auth::permissions::PROFESSIONALS_MANAGE;
use crate::booking::scheduler;
use crate::core::ServerState;
use crate::store::Store;
use crate::store::repository::{branch, professional};
use crate::utils::time::{now_local, parse_date};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "professional";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// YYYY-MM-DD
    pub date: String,
    pub service_id: i64,
}

/// Free start times (HH:MM)
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub professional_id: i64,
    pub service_id: i64,
    pub date: String,
    pub slots: Vec<String>,
}

/// 校验每周排班
///
/// 工作日: start < end，门店存在且营业中
async fn validate_schedule(store: &Store, schedule: &WeeklySchedule) -> AppResult<()> {
    for (weekday, day) in schedule.days() {
        if !day.active {
            continue;
        }
        if day.start >= day.end {
            return Err(AppError::new(ErrorCode::ScheduleInvalid)
                .with_detail("day", weekday.to_string())
                .with_detail("reason", "start must be before end"));
        }
        let Some(branch_id) = day.branch_id else {
            return Err(AppError::new(ErrorCode::ScheduleInvalid)
                .with_detail("day", weekday.to_string())
                .with_detail("reason", "a working day needs a branch"));
        };
        branch::require_active(store, branch_id).await?;
    }
    Ok(())
}

/// GET /api/professionals - 专业人员列表
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Professional>>> {
    let include_inactive =
        query.include_inactive && current_user.has_permission(PROFESSIONALS_MANAGE);
    let mut list = professional::find_all(&state.store, include_inactive).await;
    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(list))
}

/// GET /api/professionals/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Professional>> {
    Ok(Json(state.store.professionals.require(id).await?))
}

/// GET /api/professionals/:id/availability?date=&service_id= - 可用时段
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = parse_date(&query.date)?;
    let slots = scheduler::availability(
        &state.store,
        id,
        query.service_id,
        date,
        state.config.slot_minutes,
        now_local(),
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        professional_id: id,
        service_id: query.service_id,
        date: date.to_string(),
        slots: slots
            .into_iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect(),
    }))
}

fn own_professional_id(current_user: &CurrentUser) -> AppResult<i64> {
    current_user
        .professional_id
        .ok_or_else(|| AppError::new(ErrorCode::NotAProfessional))
}

/// GET /api/professionals/me/schedule - 自己的每周排班
pub async fn my_schedule(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<WeeklySchedule>> {
    let id = own_professional_id(&current_user)?;
    let pro = state.store.professionals.require(id).await?;
    Ok(Json(pro.schedule))
}

/// PUT /api/professionals/me/schedule - 替换自己的每周排班
///
/// 已有预约不受影响
pub async fn update_my_schedule(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(schedule): Json<WeeklySchedule>,
) -> AppResult<Json<WeeklySchedule>> {
    let id = own_professional_id(&current_user)?;
    validate_schedule(&state.store, &schedule).await?;

    let before = state.store.professionals.require(id).await?;
    let pro = professional::set_schedule(&state.store, id, schedule).await?;
    let id = pro.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ScheduleChanged,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before.schedule, &pro.schedule, "schedule")
    );

    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&pro))
        .await;

    Ok(Json(pro.schedule))
}

/// POST /api/professionals - 创建专业人员档案
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProfessionalCreate>,
) -> AppResult<Json<Professional>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.specialty, "specialty", MAX_SHORT_TEXT_LEN)?;
    if let Some(schedule) = &payload.schedule {
        validate_schedule(&state.store, schedule).await?;
    }

    let account = state.store.users.require(payload.user_id).await?;
    if account.role != Role::Professional {
        return Err(AppError::validation("Linked user must have the professional role")
            .with_detail("user_id", account.id));
    }

    let pro = professional::create(&state.store, payload).await?;
    let id = pro.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProfessionalCreated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_snapshot(&pro, RESOURCE)
    );

    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&pro))
        .await;

    Ok(Json(pro))
}

/// PUT /api/professionals/:id - 更新专业人员档案
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProfessionalUpdate>,
) -> AppResult<Json<Professional>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.specialty, "specialty", MAX_SHORT_TEXT_LEN)?;
    if let Some(schedule) = &payload.schedule {
        validate_schedule(&state.store, schedule).await?;
    }

    let before = state.store.professionals.require(id).await?;
    let pro = professional::update(&state.store, id, payload).await?;
    let id = pro.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProfessionalUpdated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before, &pro, RESOURCE)
    );

    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&pro))
        .await;

    Ok(Json(pro))
}

/// DELETE /api/professionals/:id - 删除专业人员 (有待处理预约时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let pro = professional::delete(&state.store, id).await?;
    let id = pro.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProfessionalDeleted,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_delete_details(&pro.name)
    );

    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id, None)
        .await;

    Ok(Json(true))
}
