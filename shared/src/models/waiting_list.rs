//! Waiting List Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Waiting list entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitingStatus {
    /// Waiting for a slot to open
    Waiting,
    /// Told that a slot opened
    Notified,
    /// Client booked on that date
    Booked,
    Cancelled,
}

impl WaitingStatus {
    /// Waiting or notified
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Notified)
    }
}

/// Waiting list entry entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingListEntry {
    pub id: i64,
    pub client_id: i64,
    pub date: NaiveDate,
    /// Specific professional, or any
    pub professional_id: Option<i64>,
    pub service_id: Option<i64>,
    pub notes: Option<String>,
    pub status: WaitingStatus,
    pub created_at: i64,
}

impl WaitingListEntry {
    /// Whether a slot of `professional_id` on `date` satisfies this entry
    pub fn matches(&self, date: NaiveDate, professional_id: i64) -> bool {
        self.date == date && self.professional_id.is_none_or(|p| p == professional_id)
    }
}

/// Join the waiting list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingListJoin {
    pub date: NaiveDate,
    pub professional_id: Option<i64>,
    pub service_id: Option<i64>,
    pub notes: Option<String>,
}
