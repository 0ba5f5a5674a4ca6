//! 消息总线消息类型定义
//!
//! 这些类型在 booking-server 和 clients 之间共享，用于
//! 进程内广播和 SSE 推送。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 预约领域事件 (新预约 / 取消 / 空位释放)
    Booking = 1,
    /// 用户通知 (带 target)
    Notification = 2,
    /// 同步信号
    Sync = 4,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EventType::Booking),
            2 => Ok(EventType::Notification),
            4 => Ok(EventType::Sync),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Booking => write!(f, "booking"),
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub source: Option<String>,
    /// 目标用户 ID (通知消息)；None 表示广播
    pub target: Option<String>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            source: None,
            target: None,
            payload,
        }
    }

    /// 设置目标用户
    pub fn with_target(mut self, target: impl ToString) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// 设置消息来源
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 创建预约事件消息
    pub fn booking(event: &BookingEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Booking, serde_json::to_vec(event)?))
    }

    /// 创建通知消息
    pub fn notification(payload: &NotificationPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Notification, serde_json::to_vec(payload)?))
    }

    /// 创建同步信号消息
    pub fn sync(payload: &SyncPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Sync, serde_json::to_vec(payload)?))
    }

    /// 是否发给指定用户
    pub fn is_for(&self, user_id: i64) -> bool {
        self.target.as_deref() == Some(user_id.to_string().as_str())
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn cancellation() -> BookingEvent {
        BookingEvent::Cancellation {
            appointment_id: 10,
            client_id: 20,
            professional_id: 30,
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            cancelled_by: 20,
        }
    }

    #[test]
    fn test_booking_message() {
        let msg = BusMessage::booking(&cancellation()).unwrap();
        assert_eq!(msg.event_type, EventType::Booking);
        assert!(!msg.request_id.is_nil());
        assert!(msg.target.is_none());

        let parsed: BookingEvent = msg.parse_payload().unwrap();
        assert_eq!(parsed, cancellation());
        assert_eq!(parsed.name(), "cancellation");
    }

    #[test]
    fn test_booking_event_wire_format() {
        let json = serde_json::to_value(cancellation()).unwrap();
        assert_eq!(json["type"], "cancellation");
        assert_eq!(json["date"], "2026-05-04");
        assert_eq!(json["time"], "11:30");
    }

    #[test]
    fn test_notification_target() {
        let payload = NotificationPayload {
            title: "Cancelled".to_string(),
            message: "Appointment cancelled".to_string(),
            level: NotificationLevel::Warning,
            event: cancellation(),
            play_sound: true,
            created_at: 0,
        };
        let msg = BusMessage::notification(&payload).unwrap().with_target(42);
        assert_eq!(msg.event_type, EventType::Notification);
        assert!(msg.is_for(42));
        assert!(!msg.is_for(4));
    }

    #[test]
    fn test_event_type_from_u8() {
        assert_eq!(EventType::try_from(1), Ok(EventType::Booking));
        assert_eq!(EventType::try_from(4), Ok(EventType::Sync));
        assert!(EventType::try_from(3).is_err());
    }
}
