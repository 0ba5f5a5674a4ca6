//! Appointment Model

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::hhmm;

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Pending or confirmed: occupies the professional's time
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub professional_id: i64,
    pub service_id: i64,
    pub branch_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    /// Price copied from the service at booking time
    pub price: Decimal,
    /// 1-5, set once after completion
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Appointment {
    /// Occupied range as minutes since midnight `[start, end)`
    pub fn span(&self) -> (u32, u32) {
        let start = hhmm::minute_of_day(self.time);
        (start, start + self.duration_minutes)
    }

    /// Sort key (date, time)
    pub fn starts_at(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }
}

/// Booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub professional_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub notes: Option<String>,
}

/// Status change request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

/// Rating request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

/// Appointment with display names resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: Option<String>,
    pub professional_name: Option<String>,
    pub service_name: Option<String>,
}

/// Client appointment list split into upcoming and history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyAppointments {
    /// Live appointments from today on, soonest first
    pub upcoming: Vec<AppointmentView>,
    /// Everything else, most recent first
    pub history: Vec<AppointmentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_upper_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Confirmed).unwrap(),
            "\"CONFIRMED\""
        );
        let status: AppointmentStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
        assert!(serde_json::from_str::<AppointmentStatus>("\"BLOCKED\"").is_err());
    }

    #[test]
    fn live_and_terminal_are_disjoint() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
        ] {
            assert_ne!(status.is_live(), status.is_terminal());
        }
    }
}
