//! Notification API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Extension, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use shared::message::{BusMessage, EventType, NotificationPayload};
use shared::models::NotificationSummary;
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/notifications - 通知摘要
pub async fn summary(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Json<NotificationSummary> {
    Json(state.notifications.summary(current_user.id))
}

/// POST /api/notifications/read - 全部标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Json<NotificationSummary> {
    Json(state.notifications.mark_read(current_user.id))
}

/// 从总线消息中取出发给 `user_id` 的通知事件
fn to_event(msg: &BusMessage, user_id: i64) -> Option<Event> {
    if msg.event_type != EventType::Notification || !msg.is_for(user_id) {
        return None;
    }
    let payload: NotificationPayload = match msg.parse_payload() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed notification payload");
            return None;
        }
    };
    match Event::default().event("notification").json_data(&payload) {
        Ok(event) => Some(event.id(msg.request_id.to_string())),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode notification event");
            None
        }
    }
}

fn notification_stream(
    rx: Receiver<BusMessage>,
    user_id: i64,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if let Some(event) = to_event(&msg, user_id) {
                        return Some((Ok(event), rx));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id, skipped, "Notification stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// GET /api/notifications/stream - SSE 推送当前用户的通知
pub async fn stream(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(user_id = current_user.id, "Notification stream opened");
    let rx = state.message_bus().subscribe();
    Sse::new(notification_stream(rx, current_user.id)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use shared::message::{BookingEvent, NotificationLevel};
    use tokio::sync::broadcast;

    fn notification(target: i64) -> BusMessage {
        let payload = NotificationPayload {
            title: "New appointment".into(),
            message: "Lucía booked Haircut".into(),
            level: NotificationLevel::Info,
            event: BookingEvent::SlotOpened {
                entry_id: 9,
                client_id: target,
                professional_id: 1,
                date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            },
            play_sound: true,
            created_at: 0,
        };
        let mut msg = BusMessage::new(EventType::Notification, serde_json::to_vec(&payload).unwrap());
        msg.target = Some(target.to_string());
        msg
    }

    #[tokio::test]
    async fn stream_only_yields_own_notifications() {
        let (tx, rx) = broadcast::channel(16);
        let mut stream = Box::pin(notification_stream(rx, 7));

        tx.send(notification(8)).unwrap();
        tx.send(BusMessage::new(EventType::Sync, b"{}".to_vec())).unwrap();
        tx.send(notification(7)).unwrap();
        drop(tx);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }
}
