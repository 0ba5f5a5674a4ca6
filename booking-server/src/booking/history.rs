//! Client appointment listing
//!
//! Upcoming means dated today or later **and** still pending or confirmed.
//! Everything else is history, so an appointment cancelled for today is
//! already history.

use chrono::NaiveDate;
use shared::models::{AppointmentView, MyAppointments};

pub fn split_upcoming(mut views: Vec<AppointmentView>, today: NaiveDate) -> MyAppointments {
    views.sort_by_key(|v| v.appointment.starts_at());

    let (upcoming, mut history): (Vec<_>, Vec<_>) = views.into_iter().partition(|v| {
        v.appointment.date >= today && v.appointment.status.is_live()
    });
    history.reverse();

    MyAppointments { upcoming, history }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveTime};
    use rust_decimal::Decimal;
    use shared::models::{Appointment, AppointmentStatus};

    fn view(id: i64, date: NaiveDate, hour: u32, status: AppointmentStatus) -> AppointmentView {
        AppointmentView {
            appointment: Appointment {
                id,
                client_id: 1,
                professional_id: 2,
                service_id: 3,
                branch_id: None,
                date,
                time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                duration_minutes: 30,
                status,
                price: Decimal::ZERO,
                rating: None,
                notes: None,
                created_at: 0,
                updated_at: 0,
            },
            client_name: None,
            professional_name: None,
            service_name: None,
        }
    }

    fn ids(list: &[AppointmentView]) -> Vec<i64> {
        list.iter().map(|v| v.appointment.id).collect()
    }

    #[test]
    fn cancelled_today_is_history() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
        let mine = split_upcoming(
            vec![
                view(1, today, 15, AppointmentStatus::Cancelled),
                view(2, today, 16, AppointmentStatus::Confirmed),
            ],
            today,
        );
        assert_eq!(ids(&mine.upcoming), vec![2]);
        assert_eq!(ids(&mine.history), vec![1]);
    }

    #[test]
    fn upcoming_ascending_and_history_descending() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        let last_week = today.checked_sub_days(Days::new(7)).unwrap();
        let mine = split_upcoming(
            vec![
                view(1, tomorrow, 9, AppointmentStatus::Pending),
                view(2, today, 18, AppointmentStatus::Pending),
                view(3, last_week, 10, AppointmentStatus::Completed),
                view(4, today, 8, AppointmentStatus::Completed),
                // never confirmed, date passed
                view(5, last_week, 12, AppointmentStatus::Pending),
            ],
            today,
        );
        assert_eq!(ids(&mine.upcoming), vec![2, 1]);
        assert_eq!(ids(&mine.history), vec![4, 5, 3]);
    }
}
