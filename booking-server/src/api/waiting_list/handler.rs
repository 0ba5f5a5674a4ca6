//! Waiting List API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{WaitingListEntry, WaitingListJoin};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::store::repository::waiting_list;
use crate::utils::time::{parse_date, today};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "waiting_list";

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// YYYY-MM-DD
    pub date: String,
}

/// POST /api/waiting-list - 加入等候名单
pub async fn join(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<WaitingListJoin>,
) -> AppResult<Json<WaitingListEntry>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    if payload.date < today() {
        return Err(AppError::validation("Cannot join the waiting list for a past date"));
    }
    if let Some(professional_id) = payload.professional_id {
        let p = state.store.professionals.require(professional_id).await?;
        if !p.is_active {
            return Err(AppError::not_found_with(
                ErrorCode::ProfessionalNotFound,
                professional_id,
            ));
        }
    }
    if let Some(service_id) = payload.service_id {
        state.store.services.require(service_id).await?;
    }

    let entry = waiting_list::join(&state.store, current_user.id, payload).await?;

    tracing::info!(
        entry_id = entry.id,
        client_id = current_user.id,
        date = %entry.date,
        "Joined waiting list"
    );

    state
        .broadcast_sync(RESOURCE, "created", entry.id, Some(&entry))
        .await;

    Ok(Json(entry))
}

/// GET /api/waiting-list/mine - 自己的等候记录
pub async fn mine(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<WaitingListEntry>>> {
    Ok(Json(
        waiting_list::find_by_client(&state.store, current_user.id).await,
    ))
}

/// DELETE /api/waiting-list/:id - 离开等候名单
pub async fn leave(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<WaitingListEntry>> {
    let entry = state.store.waiting_list.require(id).await?;
    if entry.client_id != current_user.id {
        return Err(AppError::not_found_with(ErrorCode::WaitingEntryNotFound, id));
    }
    if !entry.status.is_active() {
        return Err(AppError::business_rule(format!(
            "Waiting list entry is already {:?}",
            entry.status
        )));
    }

    let entry = waiting_list::cancel(&state.store, id).await?;

    state
        .broadcast_sync(RESOURCE, "updated", entry.id, Some(&entry))
        .await;

    Ok(Json(entry))
}

/// GET /api/waiting-list?date= - 按日期查看 (管理员)
pub async fn list_by_date(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<WaitingListEntry>>> {
    let date = parse_date(&query.date)?;
    Ok(Json(waiting_list::find_by_date(&state.store, date).await))
}
