use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::hhmm;

// ==================== Notification Level ====================

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通信息
    Info,
    /// 警告 (例如预约被取消)
    Warning,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// ==================== Booking Events ====================

/// 预约领域事件
///
/// 由业务处理器发布到消息总线，通知中心订阅后为相关用户生成通知。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// 新预约
    NewAppointment {
        appointment_id: i64,
        client_id: i64,
        client_name: String,
        professional_id: i64,
        service_name: String,
        date: NaiveDate,
        #[serde(with = "hhmm")]
        time: NaiveTime,
    },
    /// 预约取消
    Cancellation {
        appointment_id: i64,
        client_id: i64,
        professional_id: i64,
        date: NaiveDate,
        #[serde(with = "hhmm")]
        time: NaiveTime,
        /// 执行取消操作的用户
        cancelled_by: i64,
    },
    /// 候补名单: 有空位释放
    SlotOpened {
        entry_id: i64,
        client_id: i64,
        professional_id: i64,
        date: NaiveDate,
        #[serde(with = "hhmm")]
        time: NaiveTime,
    },
}

impl BookingEvent {
    /// 事件名 (用于日志和 SSE event 字段)
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewAppointment { .. } => "new_appointment",
            Self::Cancellation { .. } => "cancellation",
            Self::SlotOpened { .. } => "slot_opened",
        }
    }
}

// ==================== Payloads ====================

/// 通知载荷 (服务端 -> 指定用户)
///
/// 通知中心为每个接收者生成一条，`play_sound` 取自接收者的声音偏好。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// 标题
    pub title: String,
    /// 消息内容
    pub message: String,
    /// 通知级别
    pub level: NotificationLevel,
    /// 触发通知的事件
    pub event: BookingEvent,
    /// 客户端是否应播放提示音
    pub play_sound: bool,
    /// 生成时间 (毫秒时间戳)
    pub created_at: i64,
}

/// 同步信号载荷 (服务端 -> 所有客户端)
///
/// 当某个资源发生变更时，服务端广播此信号，通知所有感兴趣的客户端刷新数据。
///
/// # 示例
/// - `resource`: "appointment"
/// - `version`: 42
/// - `action`: "updated"
/// - `id`: "123"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 资源类型 (例如: "service", "appointment", "schedule_block")
    pub resource: String,
    /// 版本号 (单调递增，按资源类型计数)
    pub version: u64,
    /// 变更类型 ("created", "updated", "deleted")
    pub action: String,
    /// 资源 ID
    pub id: String,
    /// 资源数据 (deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
