//! 消息总线核心实现
//!
//! # 架构
//!
//! ```text
//! HTTP handlers ──publish(Booking/Sync)──▶ broadcast::Sender<BusMessage>
//!                                                   │
//!              ┌────────────────────────────────────┼──────────────────┐
//!              ▼                                    ▼                  ▼
//!     NotificationCenter                      SSE 连接 (每用户)      测试订阅者
//!     (Booking → Notification)
//! ```

use shared::message::BusMessage;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::utils::AppError;

/// 默认广播通道容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 消息总线 - 进程内广播
///
/// 发布时没有订阅者不算错误（例如没有打开的 SSE 连接）。
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发布消息到所有订阅者
    pub fn publish(&self, msg: BusMessage) -> Result<(), AppError> {
        if self.shutdown_token.is_cancelled() {
            return Err(AppError::internal("Message bus is shut down"));
        }
        match self.tx.send(msg) {
            Ok(receivers) => {
                tracing::trace!(receivers, "Bus message published");
            }
            Err(broadcast::error::SendError(msg)) => {
                tracing::debug!(event_type = %msg.event_type, "No subscribers for bus message");
            }
        }
        Ok(())
    }

    /// 订阅总线消息
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// 当前订阅者数量
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 关闭消息总线
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
