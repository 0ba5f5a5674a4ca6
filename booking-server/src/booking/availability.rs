//! Slot Availability
//!
//! Pure slot arithmetic over minute-of-day spans `[start, end)`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use shared::error::ErrorCode;
use shared::models::hhmm::{from_minute_of_day, minute_of_day};
use shared::models::{Appointment, DaySchedule, ScheduleBlock, WeeklySchedule};

/// Half-open minute span
pub type Span = (u32, u32);

/// Whether two half-open spans intersect
pub fn overlaps(a: Span, b: Span) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Spans taken by live appointments and blocks
pub fn busy_spans(appointments: &[Appointment], blocks: &[ScheduleBlock]) -> Vec<Span> {
    appointments
        .iter()
        .filter(|a| a.status.is_live())
        .map(Appointment::span)
        .chain(blocks.iter().map(ScheduleBlock::span))
        .collect()
}

/// Working day for a date, if the professional works that weekday
pub fn working_day(schedule: &WeeklySchedule, date: NaiveDate) -> Option<&DaySchedule> {
    let day = schedule.day(date.weekday());
    day.active.then_some(day)
}

/// Whether `[start, start + duration)` lies inside the working window
pub fn fits_day(day: &DaySchedule, start: u32, duration: u32) -> bool {
    let (open, close) = day.window();
    start >= open && start + duration <= close
}

/// Check a requested slot against the day, the clock and the busy spans
pub fn check_slot(
    day: Option<&DaySchedule>,
    date: NaiveDate,
    time: NaiveTime,
    duration: u32,
    busy: &[Span],
    now: NaiveDateTime,
) -> Result<(), ErrorCode> {
    if NaiveDateTime::new(date, time) <= now {
        return Err(ErrorCode::AppointmentInPast);
    }
    let day = day.ok_or(ErrorCode::ProfessionalUnavailable)?;
    let start = minute_of_day(time);
    if !fits_day(day, start, duration) {
        return Err(ErrorCode::OutsideWorkingHours);
    }
    let wanted = (start, start + duration);
    if busy.iter().any(|b| overlaps(wanted, *b)) {
        return Err(ErrorCode::SlotUnavailable);
    }
    Ok(())
}

/// Free start times for a service of `duration` minutes
///
/// Candidates start at the opening time and advance by `step`; a candidate
/// is free when it fits before closing and overlaps nothing in `busy`.
/// Starts at or before `not_before` (minute of day) are dropped.
pub fn free_slots(
    day: &DaySchedule,
    duration: u32,
    step: u32,
    busy: &[Span],
    not_before: Option<u32>,
) -> Vec<NaiveTime> {
    let (open, close) = day.window();
    let step = step.max(1);
    let mut slots = Vec::new();
    let mut start = open;
    while start + duration <= close {
        let candidate = (start, start + duration);
        let past = not_before.is_some_and(|limit| start <= limit);
        if !past
            && !busy.iter().any(|b| overlaps(candidate, *b))
            && let Some(time) = from_minute_of_day(start)
        {
            slots.push(time);
        }
        start += step;
    }
    slots
}

/// Minute of day before which slots on `date` are in the past
pub fn cutoff_for(date: NaiveDate, now: NaiveDateTime) -> Option<u32> {
    (date == now.date()).then(|| minute_of_day(now.time()))
}
