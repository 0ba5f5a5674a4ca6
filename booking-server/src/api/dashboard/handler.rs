//! Dashboard API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::Deserialize;
use shared::models::{AppointmentView, DashboardDay, Service};

use crate::api::target_professional;
use crate::auth::CurrentUser;
use crate::booking::dashboard::{build_agenda, day_stats};
use crate::core::ServerState;
use crate::store::repository::{appointment, schedule_block};
use crate::utils::time::{parse_date, today, validate_range};
use crate::utils::{AppError, AppResult};

/// Longest range served by `/range`
const MAX_RANGE_DAYS: i64 = 92;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// Admins only
    pub professional_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: String,
    pub to: String,
    pub professional_id: Option<i64>,
}

/// GET /api/dashboard?date=&professional_id= - 日程 + 当日统计
pub async fn day(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<DashboardDay>> {
    let professional_id = target_professional(&current_user, query.professional_id)?;
    state.store.professionals.require(professional_id).await?;
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let appointments =
        appointment::find_by_professional_date(&state.store, professional_id, date).await;
    let blocks = schedule_block::find_by_professional_date(&state.store, professional_id, date).await;

    let client_names: HashMap<i64, String> = state
        .store
        .users
        .filter(|u| appointments.iter().any(|a| a.client_id == u.id))
        .await
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();
    let services: HashMap<i64, Service> = state
        .store
        .services
        .list()
        .await
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(Json(DashboardDay {
        professional_id,
        date,
        agenda: build_agenda(&appointments, &blocks, &client_names, &services),
        stats: day_stats(&appointments, &services),
    }))
}

/// GET /api/dashboard/range?from=&to= - 区间内的预约
pub async fn range(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    let professional_id = target_professional(&current_user, query.professional_id)?;
    let from = parse_date(&query.from)?;
    let to = parse_date(&query.to)?;
    validate_range(from, to)?;
    if (to - from).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::validation(format!(
            "Range must not exceed {} days",
            MAX_RANGE_DAYS
        )));
    }

    let list = appointment::find_in_range(&state.store, professional_id, from, to).await;
    Ok(Json(appointment::with_names(&state.store, list).await))
}
