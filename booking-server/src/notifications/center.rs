//! 通知中心
//!
//! 订阅消息总线上的预约事件 (新预约 / 取消 / 空位释放)，为每个接收者：
//! - 未读数 +1，记录最后一条通知
//! - 按接收者的声音偏好设置 `play_sound`
//! - 重新发布一条带 target 的 `Notification` 消息 (供 SSE 推送)

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use shared::message::{
    BookingEvent, BusMessage, EventType, NotificationLevel, NotificationPayload,
};
use shared::models::NotificationSummary;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::message::MessageBus;
use crate::store::Store;
use crate::store::repository::user;

/// 通知中心
pub struct NotificationCenter {
    store: Arc<Store>,
    bus: MessageBus,
    inboxes: RwLock<HashMap<i64, NotificationSummary>>,
}

impl NotificationCenter {
    pub fn new(store: Arc<Store>, bus: MessageBus) -> Self {
        Self {
            store,
            bus,
            inboxes: RwLock::new(HashMap::new()),
        }
    }

    /// 用户的通知摘要
    pub fn summary(&self, user_id: i64) -> NotificationSummary {
        self.inboxes.read().get(&user_id).cloned().unwrap_or_default()
    }

    /// 未读数
    pub fn unread(&self, user_id: i64) -> u32 {
        self.inboxes.read().get(&user_id).map_or(0, |i| i.unread)
    }

    /// 标记全部已读 (保留最后一条通知)
    pub fn mark_read(&self, user_id: i64) -> NotificationSummary {
        let mut inboxes = self.inboxes.write();
        let inbox = inboxes.entry(user_id).or_default();
        inbox.unread = 0;
        inbox.clone()
    }

    /// 事件的接收者 (去重，不含事件发起人)
    async fn recipients(&self, event: &BookingEvent) -> BTreeSet<i64> {
        let mut ids = BTreeSet::new();
        match event {
            BookingEvent::NewAppointment {
                client_id,
                professional_id,
                ..
            } => {
                self.add_staff(&mut ids, *professional_id).await;
                ids.remove(client_id);
            }
            BookingEvent::Cancellation {
                client_id,
                professional_id,
                cancelled_by,
                ..
            } => {
                self.add_staff(&mut ids, *professional_id).await;
                if cancelled_by != client_id {
                    ids.insert(*client_id);
                }
                ids.remove(cancelled_by);
            }
            BookingEvent::SlotOpened { client_id, .. } => {
                ids.insert(*client_id);
            }
        }
        ids
    }

    /// 专业人员关联账号 + 所有管理员
    async fn add_staff(&self, ids: &mut BTreeSet<i64>, professional_id: i64) {
        if let Some(professional) = self.store.professionals.get(professional_id).await {
            ids.insert(professional.user_id);
        }
        ids.extend(user::find_admins(&self.store).await.iter().map(|u| u.id));
    }

    /// 处理一个预约事件，返回投递结果 `(user_id, payload)`
    pub async fn apply(&self, event: &BookingEvent) -> Vec<(i64, NotificationPayload)> {
        let (title, message, level) = describe(event);
        let mut delivered = Vec::new();

        for user_id in self.recipients(event).await {
            let Some(recipient) = self.store.users.get(user_id).await else {
                continue;
            };
            if !recipient.is_active {
                continue;
            }

            let payload = NotificationPayload {
                title: title.clone(),
                message: message.clone(),
                level,
                event: event.clone(),
                play_sound: recipient.preferences.sound_notifications,
                created_at: shared::util::now_millis(),
            };

            {
                let mut inboxes = self.inboxes.write();
                let inbox = inboxes.entry(user_id).or_default();
                inbox.unread = inbox.unread.saturating_add(1);
                inbox.last_event = Some(payload.clone());
            }

            match BusMessage::notification(&payload) {
                Ok(msg) => {
                    if let Err(e) = self
                        .bus
                        .publish(msg.with_target(user_id).with_source("notification_center"))
                    {
                        tracing::warn!(user_id, error = %e, "Failed to publish notification");
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode notification"),
            }
            delivered.push((user_id, payload));
        }

        tracing::debug!(
            event = event.name(),
            recipients = delivered.len(),
            "Booking event dispatched"
        );
        delivered
    }

    /// 后台循环：消费总线上的 Booking 消息
    pub async fn run(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<BusMessage>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("Notification center started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification center shutting down");
                    break;
                }

                msg_result = rx.recv() => {
                    match msg_result {
                        Ok(msg) if msg.event_type == EventType::Booking => {
                            match msg.parse_payload::<BookingEvent>() {
                                Ok(event) => {
                                    self.apply(&event).await;
                                }
                                Err(e) => {
                                    tracing::warn!(request_id = %msg.request_id, error = %e, "Malformed booking event");
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Notification center lagged, skipped {} messages", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Message channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn describe(event: &BookingEvent) -> (String, String, NotificationLevel) {
    match event {
        BookingEvent::NewAppointment {
            client_name,
            service_name,
            date,
            time,
            ..
        } => (
            "New appointment".to_string(),
            format!(
                "{} booked {} on {} at {}",
                client_name,
                service_name,
                date,
                time.format("%H:%M")
            ),
            NotificationLevel::Info,
        ),
        BookingEvent::Cancellation { date, time, .. } => (
            "Appointment cancelled".to_string(),
            format!(
                "The appointment on {} at {} was cancelled",
                date,
                time.format("%H:%M")
            ),
            NotificationLevel::Warning,
        ),
        BookingEvent::SlotOpened { date, time, .. } => (
            "Slot available".to_string(),
            format!(
                "A slot opened on {} at {}, book it before someone else does",
                date,
                time.format("%H:%M")
            ),
            NotificationLevel::Info,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::{Preferences, Professional, Role, User, WeeklySchedule};

    fn user(id: i64, role: Role, sound: bool) -> User {
        User {
            id,
            name: format!("user-{id}"),
            email: format!("user{id}@example.com"),
            phone: None,
            role,
            permissions: vec![],
            preferences: Preferences {
                sound_notifications: sound,
                ..Preferences::default()
            },
            avatar: None,
            loyalty_points: 0,
            is_active: true,
            password_hash: String::new(),
            created_at: 0,
        }
    }

    async fn setup() -> (Arc<Store>, MessageBus, NotificationCenter) {
        let store = Arc::new(Store::new());
        store.users.insert(user(1, Role::Admin, true)).await.unwrap();
        store.users.insert(user(2, Role::Professional, false)).await.unwrap();
        store.users.insert(user(3, Role::Client, true)).await.unwrap();
        store
            .professionals
            .insert(Professional {
                id: 20,
                user_id: 2,
                name: "Carmen".into(),
                specialty: None,
                services: vec![],
                schedule: WeeklySchedule::default(),
                is_active: true,
            })
            .await
            .unwrap();
        let bus = MessageBus::new();
        let center = NotificationCenter::new(store.clone(), bus.clone());
        (store, bus, center)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    fn new_appointment() -> BookingEvent {
        BookingEvent::NewAppointment {
            appointment_id: 99,
            client_id: 3,
            client_name: "user-3".into(),
            professional_id: 20,
            service_name: "Haircut".into(),
            date: date(),
            time: time(),
        }
    }

    #[tokio::test]
    async fn test_new_appointment_reaches_professional_and_admins() {
        let (_store, _bus, center) = setup().await;
        let delivered = center.apply(&new_appointment()).await;
        let ids: Vec<i64> = delivered.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);

        // sound follows the recipient's preference
        assert!(delivered[0].1.play_sound);
        assert!(!delivered[1].1.play_sound);

        assert_eq!(center.unread(2), 1);
        assert_eq!(center.unread(3), 0);
    }

    #[tokio::test]
    async fn test_cancellation_by_professional_notifies_client() {
        let (_store, _bus, center) = setup().await;
        let event = BookingEvent::Cancellation {
            appointment_id: 99,
            client_id: 3,
            professional_id: 20,
            date: date(),
            time: time(),
            cancelled_by: 2,
        };
        let ids: Vec<i64> = center.apply(&event).await.into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);

        let summary = center.summary(3);
        assert_eq!(summary.unread, 1);
        assert_eq!(
            summary.last_event.map(|p| p.level),
            Some(NotificationLevel::Warning)
        );
    }

    #[tokio::test]
    async fn test_cancellation_by_client_skips_client() {
        let (_store, _bus, center) = setup().await;
        let event = BookingEvent::Cancellation {
            appointment_id: 99,
            client_id: 3,
            professional_id: 20,
            date: date(),
            time: time(),
            cancelled_by: 3,
        };
        let ids: Vec<i64> = center.apply(&event).await.into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_mark_read_keeps_last_event() {
        let (_store, _bus, center) = setup().await;
        center.apply(&new_appointment()).await;
        center.apply(&new_appointment()).await;
        assert_eq!(center.unread(1), 2);

        let summary = center.mark_read(1);
        assert_eq!(summary.unread, 0);
        assert!(summary.last_event.is_some());
    }

    #[tokio::test]
    async fn test_notifications_are_republished_with_target() {
        let (_store, bus, center) = setup().await;
        let mut rx = bus.subscribe();
        center.apply(&new_appointment()).await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::Notification);
        assert!(msg.is_for(1));
        let payload: NotificationPayload = msg.parse_payload().unwrap();
        assert_eq!(payload.title, "New appointment");
    }

    #[tokio::test]
    async fn test_run_loop_consumes_booking_messages() {
        let (_store, bus, center) = setup().await;
        let center = Arc::new(center);
        let shutdown = CancellationToken::new();
        let mut notifications = bus.subscribe();
        let handle = tokio::spawn(center.clone().run(bus.subscribe(), shutdown.clone()));

        bus.publish(BusMessage::booking(&new_appointment()).unwrap())
            .unwrap();

        // the booking message itself, then the targeted notifications
        loop {
            let msg = notifications.recv().await.unwrap();
            if msg.event_type == EventType::Notification && msg.is_for(2) {
                break;
            }
        }
        assert_eq!(center.unread(2), 1);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
