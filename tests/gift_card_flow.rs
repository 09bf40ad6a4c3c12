//! 礼品卡流程集成测试
//!
//! 开发模式支付 (未配置 PAYMENT_API_URL) + 内存数据库：
//! intent 创建/取回、落卡、核销状态迁移、过滤查询。

use chrono::{Duration, Utc};
use reserva_server::db::models::{GiftCard, GiftCardFilter, GiftCardStatus};
use reserva_server::db::repository::{GiftCardRepository, RepoError};
use reserva_server::db::DbService;
use reserva_server::services::{PaymentIntentStatus, PaymentService};
use rust_decimal::Decimal;
use serde_json::json;

async fn setup() -> GiftCardRepository {
    let db = DbService::in_memory().await.expect("in-memory db");
    GiftCardRepository::new(db.db)
}

fn make_card(code: &str, intent: &str) -> GiftCard {
    GiftCard {
        id: None,
        code: code.to_string(),
        restaurant_id: "demo-restaurant".to_string(),
        amount: Decimal::from(100),
        recipient_name: "Pedro López".to_string(),
        recipient_email: "pedro@example.com".to_string(),
        sender_name: "Ana García".to_string(),
        sender_email: "ana@example.com".to_string(),
        message: Some("¡Feliz cumpleaños!".to_string()),
        status: GiftCardStatus::Active,
        used_amount: Decimal::ZERO,
        expiry_date: Utc::now() + Duration::days(365),
        payment_intent_id: intent.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_dev_mode_intent_roundtrip() {
    let payments = PaymentService::new(None, String::new());
    let metadata = json!({"restaurant_id": "demo-restaurant"});

    let intent = payments
        .create_intent(Decimal::from(75), metadata)
        .await
        .expect("create intent");
    assert_eq!(intent.status, PaymentIntentStatus::Succeeded);
    assert_eq!(intent.amount, Decimal::from(75));
    assert!(intent.client_secret.is_some());

    // 确认流程用同一 id 取回元数据
    let fetched = payments
        .retrieve_intent(&intent.id)
        .await
        .expect("retrieve intent");
    assert_eq!(fetched.metadata["restaurant_id"], "demo-restaurant");

    let err = payments.retrieve_intent("pi_missing").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_card_code_must_be_unique() {
    let repo = setup().await;
    repo.create(make_card("LAM-AAAA1111", "pi_1"))
        .await
        .expect("first card");

    let err = repo
        .create(make_card("LAM-AAAA1111", "pi_2"))
        .await
        .expect_err("duplicate code");
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn test_redeem_updates_status_and_balance() {
    let repo = setup().await;
    let card = repo
        .create(make_card("LAM-BBBB2222", "pi_3"))
        .await
        .expect("card");
    let id = card.id.as_ref().expect("persisted id");

    // 部分核销
    let (status, used) = card.redeem_at(Decimal::from(40), Utc::now()).expect("redeem");
    let updated = repo.update_usage(id, status, used).await.expect("update");
    assert_eq!(updated.status, GiftCardStatus::Active);
    assert_eq!(updated.remaining_amount(), Decimal::from(60));

    // 余额用尽
    let (status, used) = updated
        .redeem_at(Decimal::from(60), Utc::now())
        .expect("redeem rest");
    let updated = repo.update_usage(id, status, used).await.expect("update");
    assert_eq!(updated.status, GiftCardStatus::Used);
    assert_eq!(updated.remaining_amount(), Decimal::ZERO);
}

#[tokio::test]
async fn test_find_by_payment_intent_for_idempotent_confirm() {
    let repo = setup().await;
    repo.create(make_card("LAM-CCCC3333", "pi_4"))
        .await
        .expect("card");

    let found = repo
        .find_by_payment_intent("pi_4")
        .await
        .expect("query")
        .expect("card exists");
    assert_eq!(found.code, "LAM-CCCC3333");

    assert!(repo
        .find_by_payment_intent("pi_unknown")
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn test_filtered_listing() {
    let repo = setup().await;
    repo.create(make_card("LAM-DDDD4444", "pi_5"))
        .await
        .expect("card");
    let mut other = make_card("LAM-EEEE5555", "pi_6");
    other.recipient_name = "María Fernández".to_string();
    other.status = GiftCardStatus::Used;
    other.used_amount = other.amount;
    repo.create(other).await.expect("card");

    // 按收件人模糊匹配 (大小写不敏感)
    let cards = repo
        .find_filtered(GiftCardFilter {
            name: Some("maría".to_string()),
            ..Default::default()
        })
        .await
        .expect("filter by name");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].code, "LAM-EEEE5555");

    // unused 只返回 active
    let cards = repo
        .find_filtered(GiftCardFilter {
            unused: Some(true),
            ..Default::default()
        })
        .await
        .expect("filter unused");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].code, "LAM-DDDD4444");

    // 卡号片段
    let cards = repo
        .find_filtered(GiftCardFilter {
            code: Some("eeee".to_string()),
            ..Default::default()
        })
        .await
        .expect("filter by code");
    assert_eq!(cards.len(), 1);
}
