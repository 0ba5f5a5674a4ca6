//! Professional Model
//!
//! A professional is a service provider, distinct from the user account
//! (`user_id`) they log in with.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::hhmm;

/// Working hours for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Branch the professional works at on this day
    pub branch_id: Option<i64>,
    pub active: bool,
}

impl DaySchedule {
    /// A day off (inactive, 09:00-18:00 placeholder hours)
    pub fn off() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            branch_id: None,
            active: false,
        }
    }

    /// An active working day
    pub fn working(start: NaiveTime, end: NaiveTime, branch_id: i64) -> Self {
        Self {
            start,
            end,
            branch_id: Some(branch_id),
            active: true,
        }
    }

    /// Working window as minutes since midnight `[start, end)`
    pub fn window(&self) -> (u32, u32) {
        (hhmm::minute_of_day(self.start), hhmm::minute_of_day(self.end))
    }
}

/// Weekly schedule, one entry per weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            monday: DaySchedule::off(),
            tuesday: DaySchedule::off(),
            wednesday: DaySchedule::off(),
            thursday: DaySchedule::off(),
            friday: DaySchedule::off(),
            saturday: DaySchedule::off(),
            sunday: DaySchedule::off(),
        }
    }
}

impl WeeklySchedule {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// All days in Monday..Sunday order
    pub fn days(&self) -> [(Weekday, &DaySchedule); 7] {
        [
            (Weekday::Mon, &self.monday),
            (Weekday::Tue, &self.tuesday),
            (Weekday::Wed, &self.wednesday),
            (Weekday::Thu, &self.thursday),
            (Weekday::Fri, &self.friday),
            (Weekday::Sat, &self.saturday),
            (Weekday::Sun, &self.sunday),
        ]
    }
}

/// Professional entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    /// Linked user account
    pub user_id: i64,
    pub name: String,
    pub specialty: Option<String>,
    /// Offered service ids; empty means every service
    #[serde(default)]
    pub services: Vec<i64>,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    pub is_active: bool,
}

impl Professional {
    pub fn offers(&self, service_id: i64) -> bool {
        self.services.is_empty() || self.services.contains(&service_id)
    }
}

/// Create professional payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalCreate {
    pub user_id: i64,
    pub name: String,
    pub specialty: Option<String>,
    #[serde(default)]
    pub services: Vec<i64>,
    pub schedule: Option<WeeklySchedule>,
}

/// Update professional payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfessionalUpdate {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub services: Option<Vec<i64>>,
    pub schedule: Option<WeeklySchedule>,
    pub is_active: Option<bool>,
}
