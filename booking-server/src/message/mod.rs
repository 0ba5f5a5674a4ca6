//! 进程内消息总线
//!
//! 业务处理器发布 [`BookingEvent`] 与 [`SyncPayload`]，
//! 通知中心和 SSE 连接订阅。

pub mod bus;

pub use bus::MessageBus;
pub use shared::message::{
    BookingEvent, BusMessage, EventType, NotificationLevel, NotificationPayload, SyncPayload,
};
