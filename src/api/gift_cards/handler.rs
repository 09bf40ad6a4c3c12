//! Gift Card API Handlers
//!
//! 购买流程：payment-intent (支付前) → confirm (支付成功后落卡)。
//! 核销流程：verify (只读) / redeem (部分使用) / use (整卡用掉)。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::booking::code::generate_confirmation_code;
use crate::core::ServerState;
use crate::db::models::{
    GiftCard, GiftCardConfirm, GiftCardFilter, GiftCardPurchase, GiftCardRedeem, GiftCardStatus,
    Restaurant,
};
use crate::db::repository::{GiftCardRepository, RepoError, RestaurantRepository};
use crate::services::PaymentIntentStatus;
use crate::utils::{AppError, AppResult};

/// GET /api/gift-cards - 礼品卡列表 (过滤：姓名/卡号/未使用/餐厅)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<GiftCardFilter>,
) -> AppResult<Json<Vec<GiftCard>>> {
    let repo = GiftCardRepository::new(state.db.clone());
    let cards = repo.find_filtered(filter).await.map_err(AppError::from)?;
    Ok(Json(cards))
}

/// POST /api/gift-cards/payment-intent - 创建支付 intent
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    Json(payload): Json<GiftCardPurchase>,
) -> AppResult<Json<Value>> {
    payload.validate()?;
    if payload.amount <= rust_decimal::Decimal::ZERO {
        return Err(AppError::validation("Amount must be positive"));
    }
    require_restaurant(&state, &payload.restaurant_id).await?;

    let metadata = json!({
        "type": "gift_card",
        "restaurant_id": payload.restaurant_id,
        "recipient_name": payload.recipient_name,
        "recipient_email": payload.recipient_email,
        "sender_name": payload.sender_name,
        "sender_email": payload.sender_email,
        "message": payload.message,
    });

    let intent = state
        .payments
        .create_intent(payload.amount, metadata)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "payment_intent_id": intent.id,
        "client_secret": intent.client_secret,
    })))
}

/// 从 intent 元数据还原购买信息
#[derive(Debug, Deserialize)]
struct PurchaseMeta {
    restaurant_id: String,
    recipient_name: String,
    recipient_email: String,
    sender_name: String,
    sender_email: String,
    message: Option<String>,
}

/// POST /api/gift-cards/confirm - 支付成功后落卡
///
/// 幂等：同一 intent 再次确认返回已创建的卡。
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<GiftCardConfirm>,
) -> AppResult<Json<GiftCard>> {
    let restaurant = require_restaurant(&state, &payload.restaurant_id).await?;
    let repo = GiftCardRepository::new(state.db.clone());

    if let Some(existing) = repo
        .find_by_payment_intent(&payload.payment_intent_id)
        .await
        .map_err(AppError::from)?
    {
        return Ok(Json(existing));
    }

    let intent = state
        .payments
        .retrieve_intent(&payload.payment_intent_id)
        .await
        .map_err(|e| AppError::Invalid(e.to_string()))?;

    if intent.status != PaymentIntentStatus::Succeeded {
        return Err(AppError::BusinessRule(
            "Payment has not completed".to_string(),
        ));
    }

    let meta: PurchaseMeta = serde_json::from_value(intent.metadata.clone())
        .map_err(|e| AppError::Invalid(format!("Malformed intent metadata: {}", e)))?;
    if meta.restaurant_id != payload.restaurant_id {
        return Err(AppError::Invalid(
            "Payment intent belongs to another restaurant".to_string(),
        ));
    }

    let now = Utc::now();
    let expiry = now + Duration::days(i64::from(restaurant.gift_cards.validity_days));
    let prefix = restaurant.gift_cards.prefix.to_uppercase();

    // 卡号唯一索引冲突时换号重试 (同确认码策略)
    let mut created = None;
    for _ in 0..3 {
        let card = GiftCard {
            id: None,
            code: format!("{}-{}", prefix, generate_confirmation_code()),
            restaurant_id: payload.restaurant_id.clone(),
            amount: intent.amount,
            recipient_name: meta.recipient_name.clone(),
            recipient_email: meta.recipient_email.clone(),
            sender_name: meta.sender_name.clone(),
            sender_email: meta.sender_email.clone(),
            message: meta.message.clone(),
            status: GiftCardStatus::Active,
            used_amount: rust_decimal::Decimal::ZERO,
            expiry_date: expiry,
            payment_intent_id: payload.payment_intent_id.clone(),
            created_at: now,
        };
        match repo.create(card).await {
            Ok(c) => {
                created = Some(c);
                break;
            }
            Err(RepoError::Duplicate(msg)) => {
                tracing::warn!("Gift card code collision, retrying: {}", msg);
            }
            Err(e) => return Err(e.into()),
        }
    }
    let card = created
        .ok_or_else(|| AppError::Internal("gift card code generation failed".to_string()))?;

    // 通知收件人与购买者：fire-and-forget
    let notifier = state.notifier.clone();
    let notify_card = card.clone();
    tokio::spawn(async move {
        notifier.send_gift_card_emails(&notify_card, &restaurant).await;
    });

    Ok(Json(card))
}

#[derive(Debug, Deserialize)]
pub struct RestaurantScope {
    pub restaurant_id: String,
}

/// GET /api/gift-cards/verify/:code?restaurant_id= - 核验礼品卡
///
/// 已过期但状态未迁移的卡在这里落库为 expired。
pub async fn verify(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(scope): Query<RestaurantScope>,
) -> AppResult<Json<Value>> {
    let repo = GiftCardRepository::new(state.db.clone());
    let card = find_card(&repo, &code, &scope.restaurant_id).await?;

    let now = Utc::now();
    if card.status == GiftCardStatus::Active && card.is_expired_at(now) {
        expire_card(&repo, &card).await?;
        return Err(AppError::BusinessRule("Gift card has expired".to_string()));
    }
    card.verify_at(now)
        .map_err(|e| AppError::BusinessRule(e.to_string()))?;

    Ok(Json(json!({
        "code": card.code,
        "amount": card.amount,
        "remaining_amount": card.remaining_amount(),
        "expiry_date": card.expiry_date,
    })))
}

/// POST /api/gift-cards/redeem - 部分核销
pub async fn redeem(
    State(state): State<ServerState>,
    Json(payload): Json<GiftCardRedeem>,
) -> AppResult<Json<Value>> {
    let repo = GiftCardRepository::new(state.db.clone());
    let card = find_card(&repo, &payload.code, &payload.restaurant_id).await?;

    let now = Utc::now();
    if card.status == GiftCardStatus::Active && card.is_expired_at(now) {
        expire_card(&repo, &card).await?;
        return Err(AppError::BusinessRule("Gift card has expired".to_string()));
    }

    let (status, used) = card
        .redeem_at(payload.amount, now)
        .map_err(|e| AppError::BusinessRule(e.to_string()))?;

    let id = card
        .id
        .as_ref()
        .ok_or_else(|| AppError::Internal("gift card without id".to_string()))?;
    let updated = repo
        .update_usage(id, status, used)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "remaining_amount": updated.remaining_amount(),
        "status": updated.status,
    })))
}

/// PUT /api/gift-cards/:id/use - 整卡用掉
pub async fn mark_used(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(scope): Json<RestaurantScope>,
) -> AppResult<Json<GiftCard>> {
    let repo = GiftCardRepository::new(state.db.clone());
    let card = repo
        .find_by_id_for_restaurant(&id, &scope.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Gift card not found for this restaurant"))?;

    card.verify_at(Utc::now())
        .map_err(|e| AppError::BusinessRule(e.to_string()))?;

    let record_id = card
        .id
        .as_ref()
        .ok_or_else(|| AppError::Internal("gift card without id".to_string()))?;
    let updated = repo
        .update_usage(record_id, GiftCardStatus::Used, card.amount)
        .await
        .map_err(AppError::from)?;
    Ok(Json(updated))
}

// ========== internals ==========

async fn require_restaurant(state: &ServerState, slug: &str) -> AppResult<Restaurant> {
    let repo = RestaurantRepository::new(state.db.clone());
    repo.find_by_slug(slug)
        .await
        .map_err(AppError::from)?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", slug)))
}

async fn find_card(
    repo: &GiftCardRepository,
    code: &str,
    restaurant_id: &str,
) -> AppResult<GiftCard> {
    repo.find_by_code_for_restaurant(code, restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Gift card not found for this restaurant"))
}

async fn expire_card(repo: &GiftCardRepository, card: &GiftCard) -> AppResult<()> {
    if let Some(id) = card.id.as_ref() {
        repo.update_usage(id, GiftCardStatus::Expired, card.used_amount)
            .await
            .map_err(AppError::from)?;
    }
    Ok(())
}
