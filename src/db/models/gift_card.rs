//! Gift Card Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;
use validator::Validate;

/// 礼品卡业务错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GiftCardError {
    #[error("Gift card is not active")]
    NotActive,

    #[error("Gift card has expired")]
    Expired,

    #[error("Insufficient balance (remaining: {remaining})")]
    InsufficientBalance { remaining: Decimal },

    #[error("Redeem amount must be positive")]
    NonPositiveAmount,
}

/// Gift card status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardStatus {
    Active,
    Used,
    Expired,
}

/// Gift card entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftCard {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "PREFIX-XXXXXXXX"，全局唯一
    pub code: String,
    pub restaurant_id: String,
    pub amount: Decimal,
    pub recipient_name: String,
    pub recipient_email: String,
    pub sender_name: String,
    pub sender_email: String,
    pub message: Option<String>,
    pub status: GiftCardStatus,
    pub used_amount: Decimal,
    pub expiry_date: DateTime<Utc>,
    /// 支付服务返回的 intent 标识
    pub payment_intent_id: String,
    pub created_at: DateTime<Utc>,
}

impl GiftCard {
    pub fn remaining_amount(&self) -> Decimal {
        self.amount - self.used_amount
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }

    /// Usability check: active and not past expiry.
    ///
    /// 已到期但状态仍为 active 的卡返回 `Expired`，
    /// 调用方据此把状态迁移落库。
    pub fn verify_at(&self, now: DateTime<Utc>) -> Result<(), GiftCardError> {
        if self.status != GiftCardStatus::Active {
            return Err(GiftCardError::NotActive);
        }
        if self.is_expired_at(now) {
            return Err(GiftCardError::Expired);
        }
        Ok(())
    }

    /// Redeem `amount` against the card, returning the new
    /// `(status, used_amount)` pair. 余额用尽时迁移到 `used`。
    pub fn redeem_at(
        &self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(GiftCardStatus, Decimal), GiftCardError> {
        self.verify_at(now)?;
        if amount <= Decimal::ZERO {
            return Err(GiftCardError::NonPositiveAmount);
        }

        let remaining = self.remaining_amount();
        if amount > remaining {
            return Err(GiftCardError::InsufficientBalance { remaining });
        }

        let used = self.used_amount + amount;
        let status = if used >= self.amount {
            GiftCardStatus::Used
        } else {
            GiftCardStatus::Active
        };
        Ok((status, used))
    }
}

/// Payment intent request for a new gift card
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GiftCardPurchase {
    pub restaurant_id: String,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 120))]
    pub recipient_name: String,
    #[validate(email)]
    pub recipient_email: String,
    #[validate(length(min = 1, max = 120))]
    pub sender_name: String,
    #[validate(email)]
    pub sender_email: String,
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

/// Confirm payload: turn a succeeded payment intent into a card
#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardConfirm {
    pub payment_intent_id: String,
    pub restaurant_id: String,
}

/// Redeem payload (partial use)
#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardRedeem {
    pub code: String,
    pub restaurant_id: String,
    pub amount: Decimal,
}

/// List filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GiftCardFilter {
    /// 收件人姓名模糊匹配
    pub name: Option<String>,
    /// 卡号模糊匹配
    pub code: Option<String>,
    /// 仅未使用
    pub unused: Option<bool>,
    pub restaurant_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_card(amount: Decimal, used: Decimal) -> GiftCard {
        GiftCard {
            id: None,
            code: "LAM-ABCD1234".to_string(),
            restaurant_id: "demo-restaurant".to_string(),
            amount,
            recipient_name: "Pedro López".to_string(),
            recipient_email: "pedro@example.com".to_string(),
            sender_name: "Ana García".to_string(),
            sender_email: "ana@example.com".to_string(),
            message: None,
            status: GiftCardStatus::Active,
            used_amount: used,
            expiry_date: Utc::now() + Duration::days(365),
            payment_intent_id: "pi_test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_redeem_keeps_card_active() {
        let card = make_card(Decimal::from(100), Decimal::from(0));
        let (status, used) = card.redeem_at(Decimal::from(40), Utc::now()).unwrap();
        assert_eq!(status, GiftCardStatus::Active);
        assert_eq!(used, Decimal::from(40));
    }

    #[test]
    fn test_full_redeem_marks_used() {
        let card = make_card(Decimal::from(100), Decimal::from(60));
        let (status, used) = card.redeem_at(Decimal::from(40), Utc::now()).unwrap();
        assert_eq!(status, GiftCardStatus::Used);
        assert_eq!(used, Decimal::from(100));
    }

    #[test]
    fn test_over_redeem_rejected_with_remaining() {
        let card = make_card(Decimal::from(100), Decimal::from(80));
        assert_eq!(
            card.redeem_at(Decimal::from(40), Utc::now()),
            Err(GiftCardError::InsufficientBalance {
                remaining: Decimal::from(20)
            })
        );
    }

    #[test]
    fn test_expired_card_rejected() {
        let mut card = make_card(Decimal::from(100), Decimal::from(0));
        card.expiry_date = Utc::now() - Duration::days(1);
        assert_eq!(card.verify_at(Utc::now()), Err(GiftCardError::Expired));
    }

    #[test]
    fn test_used_card_not_active() {
        let mut card = make_card(Decimal::from(100), Decimal::from(100));
        card.status = GiftCardStatus::Used;
        assert_eq!(card.verify_at(Utc::now()), Err(GiftCardError::NotActive));
    }
}
