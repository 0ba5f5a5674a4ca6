//! Appointment API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::message::BookingEvent;
use shared::models::{
    Appointment, AppointmentCreate, AppointmentView, MyAppointments, RatingRequest, StatusUpdate,
};

use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::booking::history::split_upcoming;
use crate::booking::{StatusChange, scheduler};
use crate::core::ServerState;
use crate::store::repository::appointment;
use crate::utils::time::{now_local, today};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "appointment";
const RESOURCE_WAITING: &str = "waiting_list";

/// 单个预约 (带名称)
async fn view_of(state: &ServerState, appt: Appointment) -> AppResult<AppointmentView> {
    appointment::with_names(&state.store, vec![appt])
        .await
        .pop()
        .ok_or_else(|| AppError::internal("Appointment view missing"))
}

/// 状态变更后的事件、审计与同步
async fn announce_change(state: &ServerState, change: &StatusChange, actor: &CurrentUser) {
    let appt = &change.appointment;
    let id = appt.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::AppointmentStatusChanged,
        RESOURCE, &id,
        operator_id = Some(actor.id.to_string()),
        operator_name = Some(actor.name.clone()),
        details = serde_json::json!({
            "from": change.before,
            "to": appt.status,
            "date": appt.date,
            "time": appt.time.format("%H:%M").to_string(),
            "loyalty_awarded": change.loyalty_awarded,
        })
    );

    if appt.status == shared::models::AppointmentStatus::Cancelled {
        state.publish_event(&BookingEvent::Cancellation {
            appointment_id: appt.id,
            client_id: appt.client_id,
            professional_id: appt.professional_id,
            date: appt.date,
            time: appt.time,
            cancelled_by: actor.id,
        });

        for entry in &change.notified {
            state.publish_event(&BookingEvent::SlotOpened {
                entry_id: entry.id,
                client_id: entry.client_id,
                professional_id: appt.professional_id,
                date: appt.date,
                time: appt.time,
            });
            state
                .broadcast_sync(RESOURCE_WAITING, "updated", entry.id, Some(entry))
                .await;
        }
    }

    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(appt))
        .await;
}

/// GET /api/appointments/mine - 我的预约 (即将到来 / 历史)
pub async fn mine(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<MyAppointments>> {
    let list = appointment::find_by_client(&state.store, current_user.id).await;
    let views = appointment::with_names(&state.store, list).await;
    Ok(Json(split_upcoming(views, today())))
}

/// GET /api/appointments/:id
///
/// 其他客户的预约按不存在处理
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppointmentView>> {
    let appt = state.store.appointments.require(id).await?;
    let visible = current_user.is_admin()
        || appt.client_id == current_user.id
        || current_user.professional_id == Some(appt.professional_id);
    if !visible {
        return Err(AppError::not_found_with(ErrorCode::AppointmentNotFound, id));
    }
    Ok(Json(view_of(&state, appt).await?))
}

/// POST /api/appointments - 预约
pub async fn book(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<Json<AppointmentView>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let booked = scheduler::book(&state.store, current_user.id, payload, now_local()).await?;
    let view = view_of(&state, booked.appointment).await?;
    let appt = &view.appointment;
    let id = appt.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::AppointmentCreated,
        RESOURCE, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = serde_json::json!({
            "professional_id": appt.professional_id,
            "service_id": appt.service_id,
            "date": appt.date,
            "time": appt.time.format("%H:%M").to_string(),
            "price": appt.price,
        })
    );

    state.publish_event(&BookingEvent::NewAppointment {
        appointment_id: appt.id,
        client_id: appt.client_id,
        client_name: view.client_name.clone().unwrap_or_else(|| current_user.name.clone()),
        professional_id: appt.professional_id,
        service_name: view.service_name.clone().unwrap_or_default(),
        date: appt.date,
        time: appt.time,
    });

    for entry in &booked.fulfilled {
        state
            .broadcast_sync(RESOURCE_WAITING, "updated", entry.id, Some(entry))
            .await;
    }
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(appt))
        .await;

    tracing::info!(
        appointment_id = appt.id,
        client_id = appt.client_id,
        professional_id = appt.professional_id,
        date = %appt.date,
        time = %appt.time.format("%H:%M"),
        "Appointment booked"
    );

    Ok(Json(view))
}

/// POST /api/appointments/:id/cancel - 客户取消自己的预约
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppointmentView>> {
    let change = scheduler::cancel_by_client(&state.store, id, current_user.id).await?;
    announce_change(&state, &change, &current_user).await;
    Ok(Json(view_of(&state, change.appointment).await?))
}

/// POST /api/appointments/:id/rate - 评分 (1-5，仅一次)
pub async fn rate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RatingRequest>,
) -> AppResult<Json<AppointmentView>> {
    let appt = scheduler::rate(&state.store, id, current_user.id, payload.rating).await?;

    state
        .broadcast_sync(RESOURCE, "updated", appt.id, Some(&appt))
        .await;

    Ok(Json(view_of(&state, appt).await?))
}

/// PUT /api/appointments/:id/status - 状态变更 (按流转表)
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<AppointmentView>> {
    let change = scheduler::change_status(&state.store, id, payload.status, &current_user).await?;
    announce_change(&state, &change, &current_user).await;

    tracing::info!(
        appointment_id = id,
        from = %change.before,
        to = %change.appointment.status,
        "Appointment status changed"
    );

    Ok(Json(view_of(&state, change.appointment).await?))
}
