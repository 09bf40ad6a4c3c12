//! Gift Card Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{GiftCard, GiftCardFilter, GiftCardStatus};
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "gift_card";

#[derive(Clone)]
pub struct GiftCardRepository {
    base: BaseRepository,
}

impl GiftCardRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List gift cards, newest first, with optional filters
    pub async fn find_filtered(&self, filter: GiftCardFilter) -> RepoResult<Vec<GiftCard>> {
        let mut query = String::from("SELECT * FROM gift_card WHERE true");
        if filter.name.is_some() {
            query.push_str(" AND string::lowercase(recipient_name) CONTAINS string::lowercase($name)");
        }
        if filter.code.is_some() {
            query.push_str(" AND string::lowercase(code) CONTAINS string::lowercase($code)");
        }
        if filter.unused == Some(true) {
            query.push_str(" AND status = 'active'");
        }
        if filter.restaurant_id.is_some() {
            query.push_str(" AND restaurant_id = $rid");
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut q = self.base.db().query(query);
        if let Some(name) = filter.name {
            q = q.bind(("name", name));
        }
        if let Some(code) = filter.code {
            q = q.bind(("code", code));
        }
        if let Some(rid) = filter.restaurant_id {
            q = q.bind(("rid", rid));
        }

        let cards: Vec<GiftCard> = q.await?.take(0)?;
        Ok(cards)
    }

    /// Find by record id, scoped to a restaurant
    pub async fn find_by_id_for_restaurant(
        &self,
        id: &str,
        restaurant_id: &str,
    ) -> RepoResult<Option<GiftCard>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let card: Option<GiftCard> = self.base.db().select(thing).await?;
        Ok(card.filter(|c| c.restaurant_id == restaurant_id))
    }

    /// Find by code, scoped to a restaurant
    pub async fn find_by_code_for_restaurant(
        &self,
        code: &str,
        restaurant_id: &str,
    ) -> RepoResult<Option<GiftCard>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM gift_card WHERE code = $code AND restaurant_id = $rid LIMIT 1")
            .bind(("code", code.to_string()))
            .bind(("rid", restaurant_id.to_string()))
            .await?;
        let cards: Vec<GiftCard> = result.take(0)?;
        Ok(cards.into_iter().next())
    }

    /// Find by payment intent (confirm 幂等性检查)
    pub async fn find_by_payment_intent(&self, intent_id: &str) -> RepoResult<Option<GiftCard>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM gift_card WHERE payment_intent_id = $pid LIMIT 1")
            .bind(("pid", intent_id.to_string()))
            .await?;
        let cards: Vec<GiftCard> = result.take(0)?;
        Ok(cards.into_iter().next())
    }

    /// Persist a new gift card (code 唯一索引冲突 → Duplicate)
    pub async fn create(&self, card: GiftCard) -> RepoResult<GiftCard> {
        let created: Option<GiftCard> = self.base.db().create(TABLE).content(card).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create gift card".to_string()))
    }

    /// Update status and used amount after a redeem / use / expiry transition
    pub async fn update_usage(
        &self,
        id: &RecordId,
        status: GiftCardStatus,
        used_amount: Decimal,
    ) -> RepoResult<GiftCard> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, used_amount = $used")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("used", used_amount))
            .await?;

        let card: Option<GiftCard> = self.base.db().select(id.clone()).await?;
        card.ok_or_else(|| RepoError::NotFound(format!("Gift card {} not found", id)))
    }
}
