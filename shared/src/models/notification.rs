//! Notification inbox view types

use serde::{Deserialize, Serialize};

use crate::message::NotificationPayload;

/// Per-user notification state (`GET /api/notifications`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub unread: u32,
    /// Most recent notification for the user
    pub last_event: Option<NotificationPayload>,
}
