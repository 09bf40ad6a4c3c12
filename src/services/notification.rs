//! Notification delivery (best-effort)
//!
//! 邮件经由配置的中继服务发送 (NOTIFY_URL)。
//! 所有失败只记录日志并吞掉：预订/礼品卡已提交，
//! 通知永远不回滚业务写入。未配置中继时仅 debug 记录。

use crate::db::models::{Booking, GiftCard, Restaurant};
use serde_json::json;

#[derive(Debug)]
pub struct NotificationService {
    notify_url: Option<String>,
    client: reqwest::Client,
}

impl NotificationService {
    pub fn new(notify_url: Option<String>) -> Self {
        Self {
            notify_url,
            client: reqwest::Client::new(),
        }
    }

    /// Send the booking confirmation email
    pub async fn send_booking_confirmation(&self, booking: &Booking, restaurant: &Restaurant) {
        let payload = json!({
            "template": "booking_confirmation",
            "to": booking.customer_email,
            "data": {
                "customer_name": booking.customer_name,
                "restaurant_name": restaurant.name,
                "date": booking.date,
                "time": booking.time,
                "guests": booking.guests,
                "confirmation_code": booking.confirmation_code,
            },
        });
        self.deliver("booking_confirmation", payload).await;
    }

    /// Send gift card emails to recipient and sender
    pub async fn send_gift_card_emails(&self, card: &GiftCard, restaurant: &Restaurant) {
        let recipient = json!({
            "template": "gift_card_recipient",
            "to": card.recipient_email,
            "data": {
                "recipient_name": card.recipient_name,
                "sender_name": card.sender_name,
                "restaurant_name": restaurant.name,
                "code": card.code,
                "amount": card.amount,
                "expiry_date": card.expiry_date,
                "message": card.message,
            },
        });
        let sender = json!({
            "template": "gift_card_sender",
            "to": card.sender_email,
            "data": {
                "recipient_name": card.recipient_name,
                "restaurant_name": restaurant.name,
                "code": card.code,
                "amount": card.amount,
                "expiry_date": card.expiry_date,
            },
        });
        self.deliver("gift_card_recipient", recipient).await;
        self.deliver("gift_card_sender", sender).await;
    }

    async fn deliver(&self, kind: &str, payload: serde_json::Value) {
        let Some(url) = &self.notify_url else {
            tracing::debug!(kind = %kind, "NOTIFY_URL not configured, skipping notification");
            return;
        };

        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(kind = %kind, "Notification delivered");
            }
            Ok(resp) => {
                tracing::warn!(
                    kind = %kind,
                    status = %resp.status(),
                    "Notification relay returned non-success status"
                );
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Failed to deliver notification");
            }
        }
    }
}
