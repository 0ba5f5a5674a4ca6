//! Professional Day View
//!
//! Agenda (appointments and blocks by time) and the day's statistics.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{
    AgendaEntry, AgendaKind, Appointment, AppointmentStatus, DashboardStats, ScheduleBlock,
    Service,
};

/// Merge appointments and blocks into one agenda sorted by time
pub fn build_agenda(
    appointments: &[Appointment],
    blocks: &[ScheduleBlock],
    client_names: &HashMap<i64, String>,
    services: &HashMap<i64, Service>,
) -> Vec<AgendaEntry> {
    let mut agenda: Vec<AgendaEntry> = appointments
        .iter()
        .map(|a| AgendaEntry {
            kind: AgendaKind::Appointment,
            id: a.id,
            time: a.time,
            duration_minutes: a.duration_minutes,
            status: Some(a.status),
            client_name: client_names.get(&a.client_id).cloned(),
            service_name: services.get(&a.service_id).map(|s| s.name.clone()),
            price: Some(a.price),
            rating: a.rating,
            reason: None,
        })
        .chain(blocks.iter().map(|b| AgendaEntry {
            kind: AgendaKind::Blocked,
            id: b.id,
            time: b.time,
            duration_minutes: b.duration_minutes,
            status: None,
            client_name: None,
            service_name: None,
            price: None,
            rating: None,
            reason: b.reason.clone(),
        }))
        .collect();
    agenda.sort_by_key(|e| (e.time, e.kind == AgendaKind::Blocked));
    agenda
}

/// Statistics over one day of appointments
///
/// Commission uses the service's current percentage; appointments whose
/// service was deleted earn none.
pub fn day_stats(appointments: &[Appointment], services: &HashMap<i64, Service>) -> DashboardStats {
    let mut stats = DashboardStats::default();
    let mut ratings = Vec::new();

    for a in appointments {
        if a.status != AppointmentStatus::Cancelled {
            stats.appointments += 1;
        }
        match a.status {
            AppointmentStatus::Pending => stats.pending += 1,
            AppointmentStatus::Completed => {
                stats.completed += 1;
                stats.revenue += a.price;
                if let Some(service) = services.get(&a.service_id) {
                    stats.commission += a.price * service.commission / Decimal::ONE_HUNDRED;
                }
            }
            _ => {}
        }
        if let Some(r) = a.rating {
            ratings.push(f64::from(r));
        }
    }

    stats.commission = stats.commission.round_dp(2);
    if !ratings.is_empty() {
        stats.average_rating = Some(ratings.iter().sum::<f64>() / ratings.len() as f64);
    }
    stats
}
