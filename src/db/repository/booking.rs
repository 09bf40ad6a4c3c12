//! Booking Repository
//!
//! 预订的查询都在日历日粒度上：date 存为 ISO 日期，
//! 精确匹配即等价于 [startOfDay, endOfDay) 区间查询。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Booking, BookingStatus};
use chrono::NaiveDate;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find booking by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// Non-cancelled bookings for one exact slot (restaurant, day, hour)
    pub async fn find_by_slot(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE restaurant_id = $rid AND date = $date AND time = $time \
                 AND status != 'cancelled'",
            )
            .bind(("rid", restaurant_id.to_string()))
            .bind(("date", date))
            .bind(("time", time.to_string()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Non-cancelled bookings for a restaurant, optionally bounded by date range
    pub async fn find_by_restaurant_range(
        &self,
        restaurant_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepoResult<Vec<Booking>> {
        let mut query = String::from(
            "SELECT * FROM booking WHERE restaurant_id = $rid AND status != 'cancelled'",
        );
        if start.is_some() {
            query.push_str(" AND date >= $start");
        }
        if end.is_some() {
            query.push_str(" AND date <= $end");
        }
        query.push_str(" ORDER BY date, time");

        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("rid", restaurant_id.to_string()));
        if let Some(start) = start {
            q = q.bind(("start", start));
        }
        if let Some(end) = end {
            q = q.bind(("end", end));
        }

        let bookings: Vec<Booking> = q.await?.take(0)?;
        Ok(bookings)
    }

    /// Upcoming bookings for a customer email (today onwards)
    pub async fn find_by_customer_email(
        &self,
        email: &str,
        from: NaiveDate,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE customer_email = $email AND date >= $from \
                 ORDER BY date, time",
            )
            .bind(("email", email.to_string()))
            .bind(("from", from))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find booking by confirmation code
    pub async fn find_by_confirmation_code(&self, code: &str) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE confirmation_code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Persist a new booking.
    ///
    /// 唯一索引 `uniq_confirmation_code` 冲突时返回 [`RepoError::Duplicate`]，
    /// 调用方换码重试。
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update booking status (容量相关的唯一落库变更)
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        self.base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now")
            .bind(("thing", thing))
            .bind(("status", status.as_str()))
            .bind(("now", chrono::Utc::now()))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }
}
