//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Professional,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Professional => "professional",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "professional" => Ok(Role::Professional),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Notification preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    /// Whether the client should play a sound on new notifications
    pub sound_notifications: bool,
    pub appointment_reminders: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            sound_notifications: true,
            appointment_reminders: true,
        }
    }
}

/// Partial preferences update; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub sound_notifications: Option<bool>,
    pub appointment_reminders: Option<bool>,
}

impl PreferencesUpdate {
    pub fn apply_to(&self, prefs: &mut Preferences) {
        if let Some(v) = self.email_notifications {
            prefs.email_notifications = v;
        }
        if let Some(v) = self.sms_notifications {
            prefs.sms_notifications = v;
        }
        if let Some(v) = self.sound_notifications {
            prefs.sound_notifications = v;
        }
        if let Some(v) = self.appointment_reminders {
            prefs.appointment_reminders = v;
        }
    }
}

/// User entity
///
/// `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Permission profile (e.g. ["services:manage"], ["all"])
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    /// Avatar as an image data URL
    pub avatar: Option<String>,
    #[serde(default)]
    pub loyalty_points: u32,
    pub is_active: bool,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: i64,
}

/// Own profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Password change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Admin user update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub role: Option<Role>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Create user payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_update_is_partial() {
        let mut prefs = Preferences::default();
        PreferencesUpdate {
            sound_notifications: Some(false),
            ..Default::default()
        }
        .apply_to(&mut prefs);
        assert!(!prefs.sound_notifications);
        assert!(prefs.email_notifications);
        assert!(prefs.appointment_reminders);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: None,
            role: Role::Client,
            permissions: vec![],
            preferences: Preferences::default(),
            avatar: None,
            loyalty_points: 0,
            is_active: true,
            password_hash: "$argon2id$secret".into(),
            created_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"client\""));
    }

    #[test]
    fn role_parses_from_str() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }
}
