//! Schedule Block Model
//!
//! Marks a professional's time as unavailable for booking.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::hhmm;

/// Schedule block entity (one fixed increment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: i64,
    pub professional_id: i64,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub reason: Option<String>,
    /// User who created the block
    pub created_by: i64,
    pub created_at: i64,
}

impl ScheduleBlock {
    /// Blocked range as minutes since midnight `[start, end)`
    pub fn span(&self) -> (u32, u32) {
        let start = hhmm::minute_of_day(self.time);
        (start, start + self.duration_minutes)
    }
}

/// Block a time range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRequest {
    /// Target professional (admins only; defaults to the caller)
    pub professional_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub reason: Option<String>,
}

/// Outcome of a block request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResult {
    pub created: Vec<ScheduleBlock>,
    /// Increments that were already blocked
    pub skipped: usize,
}
