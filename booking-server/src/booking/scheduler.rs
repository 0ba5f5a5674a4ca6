//! Booking Orchestration
//!
//! Store-level operations behind the appointment and schedule endpoints.
//! Check-then-write sequences (book, block) run under
//! [`Store::schedule_lock`]; status changes re-validate the transition
//! inside the row update so concurrent changes cannot skip the table.
//!
//! Event publication and audit are left to the caller.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::hhmm::{from_minute_of_day, minute_of_day};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentStatus, BlockRequest, BlockResult, ScheduleBlock,
    WaitingListEntry,
};

use super::availability::{self, busy_spans, check_slot, cutoff_for, working_day};
use super::blocks::plan_blocks;
use super::transitions::{can_transition, check_transition};
use crate::auth::CurrentUser;
use crate::store::repository::{appointment, schedule_block, user, waiting_list};
use crate::store::{RepoError, Store};

/// Result of a booking
#[derive(Debug, Clone)]
pub struct Booked {
    pub appointment: Appointment,
    /// Waiting list entries fulfilled by this booking
    pub fulfilled: Vec<WaitingListEntry>,
}

/// Result of a status change
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub before: AppointmentStatus,
    pub appointment: Appointment,
    /// Waiting list entries notified of the freed slot (cancellations)
    pub notified: Vec<WaitingListEntry>,
    /// Loyalty points awarded to the client (completions)
    pub loyalty_awarded: u32,
}

/// Free start times of a professional for a service on a date
///
/// An inactive weekday or a past date yields no slots.
pub async fn availability(
    store: &Store,
    professional_id: i64,
    service_id: i64,
    date: NaiveDate,
    step: u32,
    now: NaiveDateTime,
) -> AppResult<Vec<NaiveTime>> {
    let professional = store.professionals.require(professional_id).await?;
    let service = store.services.require(service_id).await?;
    if !professional.offers(service.id) {
        return Err(AppError::new(ErrorCode::ServiceNotOffered));
    }
    if !professional.is_active || !service.is_active || date < now.date() {
        return Ok(vec![]);
    }
    let Some(day) = working_day(&professional.schedule, date) else {
        return Ok(vec![]);
    };

    let appointments = appointment::find_by_professional_date(store, professional_id, date).await;
    let blocks = schedule_block::find_by_professional_date(store, professional_id, date).await;
    let busy = busy_spans(&appointments, &blocks);

    Ok(availability::free_slots(
        day,
        service.duration_minutes,
        step,
        &busy,
        cutoff_for(date, now),
    ))
}

/// Book an appointment for a client
pub async fn book(
    store: &Store,
    client_id: i64,
    req: AppointmentCreate,
    now: NaiveDateTime,
) -> AppResult<Booked> {
    // Held across the reference checks; service and professional deletes take it too
    let _guard = store.schedule_lock().await;

    let service = store.services.require(req.service_id).await?;
    if !service.is_active {
        return Err(AppError::new(ErrorCode::ServiceInactive).with_detail("id", service.id));
    }
    let professional = store.professionals.require(req.professional_id).await?;
    if !professional.is_active {
        return Err(
            AppError::new(ErrorCode::ProfessionalInactive).with_detail("id", professional.id)
        );
    }
    if !professional.offers(service.id) {
        return Err(AppError::new(ErrorCode::ServiceNotOffered)
            .with_detail("professional_id", professional.id)
            .with_detail("service_id", service.id));
    }

    let appointments =
        appointment::find_by_professional_date(store, professional.id, req.date).await;
    let blocks = schedule_block::find_by_professional_date(store, professional.id, req.date).await;
    let busy = busy_spans(&appointments, &blocks);
    let day = working_day(&professional.schedule, req.date);

    check_slot(day, req.date, req.time, service.duration_minutes, &busy, now).map_err(|code| {
        AppError::new(code)
            .with_detail("date", req.date.to_string())
            .with_detail("time", req.time.format("%H:%M").to_string())
    })?;

    let stamp = shared::util::now_millis();
    let booked = store
        .appointments
        .insert(Appointment {
            id: shared::util::snowflake_id(),
            client_id,
            professional_id: professional.id,
            service_id: service.id,
            branch_id: day.and_then(|d| d.branch_id),
            date: req.date,
            time: req.time,
            duration_minutes: service.duration_minutes,
            status: AppointmentStatus::Pending,
            price: service.price,
            rating: None,
            notes: req.notes,
            created_at: stamp,
            updated_at: stamp,
        })
        .await?;
    drop(_guard);

    let fulfilled = waiting_list::mark_booked(store, client_id, req.date, professional.id).await?;

    Ok(Booked {
        appointment: booked,
        fulfilled,
    })
}

/// Move an appointment to `target`, re-checking the transition atomically
async fn transition(
    store: &Store,
    id: i64,
    target: AppointmentStatus,
) -> AppResult<(AppointmentStatus, Appointment)> {
    let mut before = None;
    let after = store
        .appointments
        .modify(id, |a| {
            if !can_transition(a.status, target) {
                return Err(RepoError::conflict(
                    ErrorCode::InvalidStatusTransition,
                    format!("Cannot change status from {} to {}", a.status, target),
                ));
            }
            before = Some(a.status);
            a.status = target;
            a.updated_at = shared::util::now_millis();
            Ok(())
        })
        .await?;
    Ok((before.unwrap_or(target), after))
}

/// Apply side effects of the new status
///
/// The status change is already committed, so failures here are logged
/// and never undo or hide it.
async fn finish_change(
    store: &Store,
    before: AppointmentStatus,
    appointment: Appointment,
) -> StatusChange {
    let mut change = StatusChange {
        before,
        notified: vec![],
        loyalty_awarded: 0,
        appointment,
    };

    match change.appointment.status {
        AppointmentStatus::Cancelled => {
            change.notified = waiting_list::notify_matching(
                store,
                change.appointment.date,
                change.appointment.professional_id,
            )
            .await;
        }
        AppointmentStatus::Completed => {
            if let Some(service) = store.services.get(change.appointment.service_id).await
                && service.loyalty.enabled
                && service.loyalty.points_per_visit > 0
            {
                match user::add_loyalty_points(
                    store,
                    change.appointment.client_id,
                    service.loyalty.points_per_visit,
                )
                .await
                {
                    Ok(_) => change.loyalty_awarded = service.loyalty.points_per_visit,
                    Err(e) => tracing::warn!(
                        appointment_id = change.appointment.id,
                        client_id = change.appointment.client_id,
                        error = %e,
                        "Loyalty points not awarded"
                    ),
                }
            }
        }
        _ => {}
    }

    change
}

/// Status change by the appointment's professional or an admin
pub async fn change_status(
    store: &Store,
    id: i64,
    target: AppointmentStatus,
    actor: &CurrentUser,
) -> AppResult<StatusChange> {
    let current = store.appointments.require(id).await?;
    if !actor.is_admin() && actor.professional_id != Some(current.professional_id) {
        return Err(AppError::permission_denied(
            "Only the assigned professional or an admin can change this appointment",
        ));
    }
    check_transition(current.status, target)?;

    let (before, after) = transition(store, id, target).await?;
    Ok(finish_change(store, before, after).await)
}

/// A client cancels their own pending or confirmed appointment
pub async fn cancel_by_client(store: &Store, id: i64, client_id: i64) -> AppResult<StatusChange> {
    let current = store.appointments.require(id).await?;
    if current.client_id != client_id {
        return Err(AppError::not_found_with(ErrorCode::AppointmentNotFound, id));
    }
    check_transition(current.status, AppointmentStatus::Cancelled)?;

    let (before, after) = transition(store, id, AppointmentStatus::Cancelled).await?;
    Ok(finish_change(store, before, after).await)
}

/// Rate an own completed appointment (1-5, once)
pub async fn rate(store: &Store, id: i64, client_id: i64, rating: u8) -> AppResult<Appointment> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("Rating must be between 1 and 5")
            .with_detail("field", "rating"));
    }
    let current = store.appointments.require(id).await?;
    if current.client_id != client_id {
        return Err(AppError::not_found_with(ErrorCode::AppointmentNotFound, id));
    }

    Ok(store
        .appointments
        .modify(id, |a| {
            if a.status != AppointmentStatus::Completed || a.rating.is_some() {
                return Err(RepoError::conflict(
                    ErrorCode::RatingNotAllowed,
                    "Only completed, unrated appointments can be rated",
                ));
            }
            a.rating = Some(rating);
            a.updated_at = shared::util::now_millis();
            Ok(())
        })
        .await?)
}

/// Block `[start, end)` of a professional's day in `step`-minute increments
///
/// All-or-nothing: an increment overlapping a live appointment rejects
/// the whole request; increments that are already blocked are skipped.
pub async fn block_range(
    store: &Store,
    professional_id: i64,
    req: &BlockRequest,
    step: u32,
    created_by: i64,
) -> AppResult<BlockResult> {
    if req.start >= req.end {
        return Err(AppError::validation("Block start must be before its end")
            .with_detail("start", req.start.format("%H:%M").to_string())
            .with_detail("end", req.end.format("%H:%M").to_string()));
    }
    let _guard = store.schedule_lock().await;
    store.professionals.require(professional_id).await?;

    let live: Vec<_> = appointment::find_live_on(store, professional_id, req.date)
        .await
        .iter()
        .map(Appointment::span)
        .collect();
    let blocked: Vec<_> = schedule_block::find_by_professional_date(store, professional_id, req.date)
        .await
        .iter()
        .map(ScheduleBlock::span)
        .collect();

    let plan = plan_blocks(
        minute_of_day(req.start),
        minute_of_day(req.end),
        step,
        &live,
        &blocked,
    )
    .map_err(|conflict| {
        let at = from_minute_of_day(conflict.start)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        AppError::with_message(
            ErrorCode::BlockConflict,
            format!("An appointment is booked at {}", at),
        )
        .with_detail("time", at)
    })?;

    let stamp = shared::util::now_millis();
    let mut created = Vec::with_capacity(plan.increments.len());
    for (start, duration) in plan.increments {
        let Some(time) = from_minute_of_day(start) else {
            continue;
        };
        let block = ScheduleBlock {
            id: shared::util::snowflake_id(),
            professional_id,
            date: req.date,
            time,
            duration_minutes: duration,
            reason: req.reason.clone(),
            created_by,
            created_at: stamp,
        };
        created.push(store.blocks.insert(block).await?);
    }

    Ok(BlockResult {
        created,
        skipped: plan.skipped,
    })
}

/// Remove one block (own blocks, or any block for admins)
pub async fn remove_block(store: &Store, id: i64, actor: &CurrentUser) -> AppResult<ScheduleBlock> {
    let block = store.blocks.require(id).await?;
    if !actor.is_admin() && actor.professional_id != Some(block.professional_id) {
        return Err(AppError::permission_denied(
            "Only the professional or an admin can remove this block",
        ));
    }
    Ok(store.blocks.delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rust_decimal_macros::dec;
    use shared::models::{
        DaySchedule, LoyaltyConfig, Preferences, Professional, Role, Service, User,
        WaitingListJoin, WaitingStatus, WeeklySchedule,
    };

    struct Fixture {
        store: Store,
        client: i64,
        professional: Professional,
        service: Service,
        date: NaiveDate,
        now: NaiveDateTime,
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    async fn fixture() -> Fixture {
        let store = Store::new();
        // a Monday, with "now" the Friday before
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let now = date
            .checked_sub_days(Days::new(3))
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let client = store
            .users
            .insert(User {
                id: 100,
                name: "Lucía".into(),
                email: "lucia@example.com".into(),
                phone: None,
                role: Role::Client,
                permissions: vec![],
                preferences: Preferences::default(),
                avatar: None,
                loyalty_points: 0,
                is_active: true,
                password_hash: String::new(),
                created_at: 0,
            })
            .await
            .unwrap();
        let service = store
            .services
            .insert(Service {
                id: 7,
                name: "Haircut".into(),
                description: None,
                category: None,
                price: dec!(25),
                duration_minutes: 30,
                commission: dec!(40),
                loyalty: LoyaltyConfig {
                    enabled: true,
                    points_per_visit: 10,
                    visits_for_reward: 10,
                },
                is_active: true,
            })
            .await
            .unwrap();
        let mut schedule = WeeklySchedule::default();
        schedule.monday = DaySchedule::working(hm(9, 0), hm(12, 0), 1);
        let professional = store
            .professionals
            .insert(Professional {
                id: 1,
                user_id: 200,
                name: "Carmen".into(),
                specialty: None,
                services: vec![],
                schedule,
                is_active: true,
            })
            .await
            .unwrap();

        Fixture {
            store,
            client: client.id,
            professional,
            service,
            date,
            now,
        }
    }

    fn request(f: &Fixture, time: NaiveTime) -> AppointmentCreate {
        AppointmentCreate {
            professional_id: f.professional.id,
            service_id: f.service.id,
            date: f.date,
            time,
            notes: None,
        }
    }

    fn pro(professional_id: i64) -> CurrentUser {
        CurrentUser {
            id: 200,
            name: "Carmen".into(),
            role: Role::Professional,
            permissions: vec![],
            professional_id: Some(professional_id),
        }
    }

    #[tokio::test]
    async fn test_book_copies_service_and_branch() {
        let f = fixture().await;
        let booked = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap();
        let a = booked.appointment;
        assert_eq!(a.status, AppointmentStatus::Pending);
        assert_eq!(a.price, dec!(25));
        assert_eq!(a.duration_minutes, 30);
        assert_eq!(a.branch_id, Some(1));
    }

    #[tokio::test]
    async fn test_book_rejects_overlap_and_outside_hours() {
        let f = fixture().await;
        book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap();

        let err = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);

        let err = book(&f.store, f.client, request(&f, hm(11, 45)), f.now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OutsideWorkingHours);

        let mut tuesday = request(&f, hm(9, 0));
        tuesday.date = f.date.succ_opt().unwrap();
        let err = book(&f.store, f.client, tuesday, f.now).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProfessionalUnavailable);
    }

    #[tokio::test]
    async fn test_cancelled_slot_can_be_rebooked() {
        let f = fixture().await;
        let first = book(&f.store, f.client, request(&f, hm(10, 0)), f.now)
            .await
            .unwrap();
        cancel_by_client(&f.store, first.appointment.id, f.client)
            .await
            .unwrap();
        assert!(
            book(&f.store, f.client, request(&f, hm(10, 0)), f.now)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_availability_excludes_busy_slots() {
        let f = fixture().await;
        book(&f.store, f.client, request(&f, hm(10, 0)), f.now)
            .await
            .unwrap();
        let slots = availability(&f.store, f.professional.id, f.service.id, f.date, 30, f.now)
            .await
            .unwrap();
        assert_eq!(slots.len(), 5);
        assert!(!slots.contains(&hm(10, 0)));
    }

    #[tokio::test]
    async fn test_status_flow_and_loyalty() {
        let f = fixture().await;
        let id = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap()
            .appointment
            .id;
        let actor = pro(f.professional.id);

        let err = change_status(&f.store, id, AppointmentStatus::Completed, &actor)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

        change_status(&f.store, id, AppointmentStatus::Confirmed, &actor)
            .await
            .unwrap();
        let done = change_status(&f.store, id, AppointmentStatus::Completed, &actor)
            .await
            .unwrap();
        assert_eq!(done.before, AppointmentStatus::Confirmed);
        assert_eq!(done.loyalty_awarded, 10);
        assert_eq!(f.store.users.get(f.client).await.unwrap().loyalty_points, 10);

        let rated = rate(&f.store, id, f.client, 5).await.unwrap();
        assert_eq!(rated.rating, Some(5));
        let err = rate(&f.store, id, f.client, 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RatingNotAllowed);
    }

    #[tokio::test]
    async fn test_completion_survives_removed_client_account() {
        let f = fixture().await;
        let id = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap()
            .appointment
            .id;
        let actor = pro(f.professional.id);
        change_status(&f.store, id, AppointmentStatus::Confirmed, &actor)
            .await
            .unwrap();
        f.store.users.delete(f.client).await.unwrap();

        let done = change_status(&f.store, id, AppointmentStatus::Completed, &actor)
            .await
            .unwrap();
        assert_eq!(done.appointment.status, AppointmentStatus::Completed);
        assert_eq!(done.loyalty_awarded, 0);
    }

    #[tokio::test]
    async fn test_other_professional_cannot_change_status() {
        let f = fixture().await;
        let id = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap()
            .appointment
            .id;
        let err = change_status(&f.store, id, AppointmentStatus::Confirmed, &pro(999))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_cancellation_notifies_waiting_list() {
        let f = fixture().await;
        let id = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap()
            .appointment
            .id;
        let waiting = waiting_list::join(
            &f.store,
            555,
            WaitingListJoin {
                date: f.date,
                professional_id: None,
                service_id: None,
                notes: None,
            },
        )
        .await
        .unwrap();

        let change = cancel_by_client(&f.store, id, f.client).await.unwrap();
        assert_eq!(change.notified.len(), 1);
        assert_eq!(change.notified[0].id, waiting.id);
        assert_eq!(change.notified[0].status, WaitingStatus::Notified);

        let err = cancel_by_client(&f.store, id, f.client).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    }

    #[tokio::test]
    async fn test_block_range_is_all_or_nothing() {
        let f = fixture().await;
        book(&f.store, f.client, request(&f, hm(10, 0)), f.now)
            .await
            .unwrap();
        let req = BlockRequest {
            professional_id: None,
            date: f.date,
            start: hm(9, 0),
            end: hm(11, 0),
            reason: None,
        };
        let err = block_range(&f.store, f.professional.id, &req, 30, 200)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BlockConflict);
        assert!(f.store.blocks.is_empty());

        let morning = BlockRequest {
            end: hm(10, 0),
            ..req
        };
        let first = block_range(&f.store, f.professional.id, &morning, 30, 200)
            .await
            .unwrap();
        assert_eq!(first.created.len(), 2);
        let again = block_range(&f.store, f.professional.id, &morning, 30, 200)
            .await
            .unwrap();
        assert!(again.created.is_empty());
        assert_eq!(again.skipped, 2);

        // blocked time is no longer bookable
        let err = book(&f.store, f.client, request(&f, hm(9, 30)), f.now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
    }

    #[tokio::test]
    async fn test_block_range_keeps_every_increment() {
        let f = fixture().await;
        let req = BlockRequest {
            professional_id: None,
            date: f.date,
            start: hm(0, 0),
            end: hm(23, 55),
            reason: Some("Closed".into()),
        };
        let result = block_range(&f.store, f.professional.id, &req, 5, 200)
            .await
            .unwrap();
        assert_eq!(result.created.len(), 287);
        assert_eq!(f.store.blocks.len(), 287);
        for block in &result.created {
            assert!(f.store.blocks.get(block.id).await.is_some());
        }

        let err = book(&f.store, f.client, request(&f, hm(9, 0)), f.now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
    }
}
