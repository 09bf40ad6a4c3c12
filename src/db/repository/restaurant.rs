//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{BookingConfig, Restaurant};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find restaurant by its public slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants.into_iter().next())
    }

    /// Create a new restaurant (配置先校验再落库)
    pub async fn create(&self, restaurant: Restaurant) -> RepoResult<Restaurant> {
        restaurant
            .booking_config
            .validate()
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let created: Option<Restaurant> =
            self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Replace the booking config of a restaurant.
    ///
    /// 唯一的配置变更入口；读路径永远只消费落库后的快照。
    pub async fn update_booking_config(
        &self,
        slug: &str,
        config: BookingConfig,
    ) -> RepoResult<Restaurant> {
        config
            .validate()
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", slug)))?;

        self.base
            .db()
            .query("UPDATE restaurant SET booking_config = $config WHERE slug = $slug")
            .bind(("config", config))
            .bind(("slug", slug.to_string()))
            .await?;

        self.find_by_slug(&existing.slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", slug)))
    }
}
