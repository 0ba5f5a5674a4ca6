//! Professional dashboard view types

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AppointmentStatus, hhmm};

/// Agenda entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    Appointment,
    Blocked,
}

/// One line of a professional's day agenda
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub kind: AgendaKind,
    /// Appointment id or block id
    pub id: i64,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub status: Option<AppointmentStatus>,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub price: Option<Decimal>,
    pub rating: Option<u8>,
    /// Block reason
    pub reason: Option<String>,
}

/// Dashboard statistics for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Non-cancelled appointments of the day
    pub appointments: usize,
    pub pending: usize,
    pub completed: usize,
    /// Sum of completed appointment prices
    pub revenue: Decimal,
    /// Sum of price x service commission% over completed appointments
    pub commission: Decimal,
    /// Mean of the ratings received on the day
    pub average_rating: Option<f64>,
}

/// Dashboard response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDay {
    pub professional_id: i64,
    pub date: NaiveDate,
    pub agenda: Vec<AgendaEntry>,
    pub stats: DashboardStats,
}
