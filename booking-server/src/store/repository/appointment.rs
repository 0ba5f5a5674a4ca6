//! Appointment Repository

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::models::{Appointment, AppointmentView};

use crate::store::Store;

/// Appointments of a client, any status
pub async fn find_by_client(store: &Store, client_id: i64) -> Vec<Appointment> {
    store
        .appointments
        .filter(|a| a.client_id == client_id)
        .await
}

/// Appointments of a professional on one date, sorted by time
pub async fn find_by_professional_date(
    store: &Store,
    professional_id: i64,
    date: NaiveDate,
) -> Vec<Appointment> {
    let mut list = store
        .appointments
        .filter(|a| a.professional_id == professional_id && a.date == date)
        .await;
    list.sort_by_key(|a| a.time);
    list
}

/// Appointments of a professional within `[from, to]`, sorted by (date, time)
pub async fn find_in_range(
    store: &Store,
    professional_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Appointment> {
    let mut list = store
        .appointments
        .filter(|a| a.professional_id == professional_id && a.date >= from && a.date <= to)
        .await;
    list.sort_by_key(|a| a.starts_at());
    list
}

/// Pending / confirmed appointments of a professional on a date
pub async fn find_live_on(
    store: &Store,
    professional_id: i64,
    date: NaiveDate,
) -> Vec<Appointment> {
    store
        .appointments
        .filter(|a| a.professional_id == professional_id && a.date == date && a.status.is_live())
        .await
}

/// Resolve client, professional and service names for display
pub async fn with_names(store: &Store, appointments: Vec<Appointment>) -> Vec<AppointmentView> {
    let users: HashMap<i64, String> = store
        .users
        .list()
        .await
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();
    let professionals: HashMap<i64, String> = store
        .professionals
        .list()
        .await
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let services: HashMap<i64, String> = store
        .services
        .list()
        .await
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    appointments
        .into_iter()
        .map(|a| AppointmentView {
            client_name: users.get(&a.client_id).cloned(),
            professional_name: professionals.get(&a.professional_id).cloned(),
            service_name: services.get(&a.service_id).cloned(),
            appointment: a,
        })
        .collect()
}
