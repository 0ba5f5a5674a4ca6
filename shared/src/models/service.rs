//! Service Model (catalog of bookable services)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loyalty program settings of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    pub enabled: bool,
    /// Points awarded per completed appointment
    pub points_per_visit: u32,
    /// Completed visits needed for a reward (>= 1 when enabled)
    pub visits_for_reward: u32,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            points_per_visit: 1,
            visits_for_reward: 10,
        }
    }
}

/// Service entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub duration_minutes: u32,
    /// Professional commission in percent (0-100)
    pub commission: Decimal,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
    pub is_active: bool,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub duration_minutes: u32,
    #[serde(default)]
    pub commission: Decimal,
    pub loyalty: Option<LoyaltyConfig>,
}

/// Update service payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub duration_minutes: Option<u32>,
    pub commission: Option<Decimal>,
    pub loyalty: Option<LoyaltyConfig>,
    pub is_active: Option<bool>,
}
