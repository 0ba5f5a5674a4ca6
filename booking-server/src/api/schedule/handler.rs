//! Schedule Block API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::models::{BlockRequest, BlockResult, ScheduleBlock};

use crate::api::target_professional;
use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::booking::scheduler;
use crate::core::ServerState;
use crate::store::repository::schedule_block;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

const RESOURCE: &str = "schedule_block";

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// YYYY-MM-DD
    pub date: String,
    pub professional_id: Option<i64>,
}

/// GET /api/schedule/blocks?date= - 当日封锁
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<Vec<ScheduleBlock>>> {
    let professional_id = target_professional(&current_user, query.professional_id)?;
    let date = parse_date(&query.date)?;
    Ok(Json(
        schedule_block::find_by_professional_date(&state.store, professional_id, date).await,
    ))
}

/// POST /api/schedule/blocks - 按步长封锁 [start, end)
///
/// 与已有预约冲突时整个请求失败，已封锁的时段跳过
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BlockRequest>,
) -> AppResult<Json<BlockResult>> {
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;
    let professional_id = target_professional(&current_user, payload.professional_id)?;

    let result = scheduler::block_range(
        &state.store,
        professional_id,
        &payload,
        state.config.slot_minutes,
        current_user.id,
    )
    .await?;

    audit_log!(
        state.audit_service,
        AuditAction::ScheduleBlocked,
        RESOURCE, format!("professional:{}", professional_id),
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = serde_json::json!({
            "date": payload.date,
            "start": payload.start.format("%H:%M").to_string(),
            "end": payload.end.format("%H:%M").to_string(),
            "created": result.created.len(),
            "skipped": result.skipped,
            "reason": &payload.reason,
        })
    );

    for block in &result.created {
        state
            .broadcast_sync(RESOURCE, "created", block.id, Some(block))
            .await;
    }

    Ok(Json(result))
}

/// DELETE /api/schedule/blocks/:id - 解除单个封锁
pub async fn remove(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ScheduleBlock>> {
    let block = scheduler::remove_block(&state.store, id, &current_user).await?;

    audit_log!(
        state.audit_service,
        AuditAction::ScheduleUnblocked,
        RESOURCE, block.id.to_string(),
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = serde_json::json!({
            "professional_id": block.professional_id,
            "date": block.date,
            "time": block.time.format("%H:%M").to_string(),
        })
    );

    state
        .broadcast_sync::<()>(RESOURCE, "deleted", block.id, None)
        .await;

    Ok(Json(block))
}

/// DELETE /api/schedule/blocks?date= - 清除当日所有封锁
pub async fn clear_day(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<Vec<ScheduleBlock>>> {
    let professional_id = target_professional(&current_user, query.professional_id)?;
    let date = parse_date(&query.date)?;

    let removed = schedule_block::delete_day(&state.store, professional_id, date).await;

    if !removed.is_empty() {
        audit_log!(
            state.audit_service,
            AuditAction::ScheduleUnblocked,
            RESOURCE, format!("professional:{}", professional_id),
            operator_id = Some(current_user.id.to_string()),
            operator_name = Some(current_user.name.clone()),
            details = serde_json::json!({
                "date": date,
                "removed": removed.len(),
            })
        );
    }

    for block in &removed {
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", block.id, None)
            .await;
    }

    Ok(Json(removed))
}
