//! Navigation menu types

use serde::{Deserialize, Serialize};

use super::Role;

/// One visible menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub key: String,
    pub label: String,
    pub path: String,
}

/// Navigation shell for the calling user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigation {
    pub role: Role,
    pub items: Vec<NavItem>,
    /// Notification badge
    pub unread: u32,
}
