//! Client-related types shared between server and client
//!
//! Session and authentication DTOs used in API communication.

use serde::{Deserialize, Serialize};

use crate::models::{Preferences, Role, User};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Persisted session value (`{id, role}`), carried in the signed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: i64,
    pub role: Role,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub session: SessionSnapshot,
    pub user: UserInfo,
}

/// Restored session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
    pub user: UserInfo,
}

/// User information as seen by the logged-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub preferences: Preferences,
    pub avatar: Option<String>,
    pub loyalty_points: u32,
    /// Linked professional profile, if any
    pub professional_id: Option<i64>,
}

impl UserInfo {
    pub fn from_user(user: &User, professional_id: Option<i64>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            permissions: user.permissions.clone(),
            preferences: user.preferences,
            avatar: user.avatar.clone(),
            loyalty_points: user.loyalty_points,
            professional_id,
        }
    }
}
