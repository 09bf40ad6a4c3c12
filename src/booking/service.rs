//! Booking Service
//!
//! 预订流程编排：排期校验 → 时段占用 → 桌台分配 → 落库 → 通知。
//! 读-算-写序列通过 [`SlotLocks`] 按时段串行化 (见 core::state)。

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::booking::allocator::{self, Allocation, AllocationError};
use crate::booking::availability::{self, DayAvailability};
use crate::booking::code::generate_confirmation_code;
use crate::booking::error::BookingError;
use crate::booking::occupancy::{self, SlotOccupancy};
use crate::booking::schedule::{self, DaySchedule};
use crate::core::state::SlotLocks;
use crate::db::models::{
    Booking, BookingCreate, BookingStatus, BookingWithRestaurant, Restaurant, RestaurantSummary,
};
use crate::db::repository::{BookingRepository, RepoError, RestaurantRepository};
use crate::services::NotificationService;

/// 确认码冲突重试上限
const MAX_CODE_RETRIES: u32 = 3;

/// Booking orchestration over restaurants + bookings
#[derive(Clone)]
pub struct BookingService {
    restaurants: RestaurantRepository,
    bookings: BookingRepository,
    slot_locks: Arc<SlotLocks>,
    notifier: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        db: Surreal<Db>,
        slot_locks: Arc<SlotLocks>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            restaurants: RestaurantRepository::new(db.clone()),
            bookings: BookingRepository::new(db),
            slot_locks,
            notifier,
        }
    }

    /// Create a booking.
    ///
    /// 成功分配即落库为 `confirmed` (策略决定，见 DESIGN.md)；
    /// 确认通知在提交后异步发送，失败不回滚预订。
    pub async fn create_booking(&self, req: BookingCreate) -> Result<Booking, BookingError> {
        let restaurant = self.require_restaurant(&req.restaurant_id).await?;
        let config = &restaurant.booking_config;

        // 1. 人数范围
        if req.guests < config.min_guests_per_booking || req.guests > config.max_guests_per_booking
        {
            return Err(BookingError::GuestCountOutOfRange {
                min: config.min_guests_per_booking,
                max: config.max_guests_per_booking,
            });
        }

        // 2. 预订窗口 [today, today + advance_booking_days]
        let today = Utc::now().date_naive();
        let horizon = today + Duration::days(i64::from(config.advance_booking_days));
        if req.date < today || req.date > horizon {
            return Err(BookingError::BookingWindowExceeded {
                days: config.advance_booking_days,
            });
        }

        // 3. 排期：闭店日或时段不存在都视为不可用
        let day = schedule::resolve_day(config, req.date);
        if day.slot_at(&req.time).is_none() {
            return Err(BookingError::SlotUnavailable);
        }

        // 4-7. 同一时段的读-算-写串行执行
        let slot_lock =
            self.slot_locks
                .for_slot(&req.restaurant_id, &req.date.to_string(), &req.time);
        let _guard = slot_lock.lock().await;

        let occupancy = self.slot_occupancy(&req.restaurant_id, req.date, &req.time).await?;

        let active_tables = config.active_tables();
        let allocation = allocator::allocate(&active_tables, &occupancy.occupied_tables, req.guests)
            .map_err(|e: AllocationError| BookingError::InvalidRequest(e.to_string()))?;

        let tables = match allocation {
            Allocation::Assigned(tables) => tables,
            Allocation::Infeasible { free_capacity } => {
                return Err(BookingError::InsufficientCapacity { free_capacity });
            }
        };

        let booking = self.persist_with_fresh_code(&req, tables).await?;

        // 8. 通知：fire-and-forget，绝不影响已提交的预订
        let notifier = self.notifier.clone();
        let notify_booking = booking.clone();
        tokio::spawn(async move {
            notifier
                .send_booking_confirmation(&notify_booking, &restaurant)
                .await;
        });

        Ok(booking)
    }

    /// Availability projection for one date (§4.4 read side)
    pub async fn availability(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
    ) -> Result<DayAvailability, BookingError> {
        let restaurant = self.require_restaurant(restaurant_id).await?;
        let config = &restaurant.booking_config;

        let day = schedule::resolve_day(config, date);
        let active_tables = config.active_tables();

        // 每个时段独立聚合占用；时段间互不影响
        let mut slots = Vec::new();
        for slot in day.slots() {
            let occupancy = self.slot_occupancy(restaurant_id, date, &slot.hour).await?;
            slots.push(availability::project_slot(
                &slot.hour,
                &active_tables,
                &occupancy,
            ));
        }

        Ok(DayAvailability {
            date,
            time_slots: slots,
        })
    }

    /// Cancel a booking; idempotency is reported, not crashed
    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }

        let id = booking
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| booking_id.to_string());
        Ok(self.bookings.update_status(&id, BookingStatus::Cancelled).await?)
    }

    /// Explicit status transition (admin surface)
    pub async fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        Ok(self.bookings.update_status(booking_id, status).await?)
    }

    /// Booking lookup by confirmation code, with restaurant summary
    pub async fn find_by_confirmation_code(
        &self,
        code: &str,
    ) -> Result<BookingWithRestaurant, BookingError> {
        let booking = self
            .bookings
            .find_by_confirmation_code(code)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(code.to_string()))?;

        let restaurant = self.require_restaurant(&booking.restaurant_id).await?;
        Ok(BookingWithRestaurant {
            booking,
            restaurant: Some(summary_of(&restaurant)),
        })
    }

    /// Non-cancelled bookings of a restaurant within an optional date range
    pub async fn bookings_for_restaurant(
        &self,
        restaurant_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Booking>, BookingError> {
        self.require_restaurant(restaurant_id).await?;
        Ok(self
            .bookings
            .find_by_restaurant_range(restaurant_id, start, end)
            .await?)
    }

    /// Upcoming bookings for a customer, each with its restaurant summary
    pub async fn bookings_for_customer(
        &self,
        email: &str,
    ) -> Result<Vec<BookingWithRestaurant>, BookingError> {
        let today = Utc::now().date_naive();
        let bookings = self.bookings.find_by_customer_email(email, today).await?;

        let mut enriched = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let restaurant = self
                .restaurants
                .find_by_slug(&booking.restaurant_id)
                .await?;
            enriched.push(BookingWithRestaurant {
                restaurant: restaurant.as_ref().map(summary_of),
                booking,
            });
        }
        Ok(enriched)
    }

    // ========== internals ==========

    async fn require_restaurant(&self, slug: &str) -> Result<Restaurant, BookingError> {
        self.restaurants
            .find_by_slug(slug)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| BookingError::RestaurantNotFound(slug.to_string()))
    }

    async fn slot_occupancy(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<SlotOccupancy, BookingError> {
        let slot_bookings = self.bookings.find_by_slot(restaurant_id, date, time).await?;
        Ok(occupancy::occupancy_of(&slot_bookings))
    }

    /// 落库，确认码唯一索引冲突时换码重试 (有界)
    async fn persist_with_fresh_code(
        &self,
        req: &BookingCreate,
        tables: Vec<u32>,
    ) -> Result<Booking, BookingError> {
        let now = Utc::now();
        let mut last_err: Option<RepoError> = None;

        for _ in 0..MAX_CODE_RETRIES {
            let booking = Booking {
                id: None,
                restaurant_id: req.restaurant_id.clone(),
                customer_name: req.customer_name.clone(),
                customer_email: req.customer_email.clone(),
                customer_phone: req.customer_phone.clone(),
                date: req.date,
                time: req.time.clone(),
                guests: req.guests,
                tables: tables.clone(),
                status: BookingStatus::Confirmed,
                special_requests: req.special_requests.clone(),
                confirmation_code: generate_confirmation_code(),
                created_at: now,
                updated_at: now,
            };

            match self.bookings.create(booking).await {
                Ok(created) => return Ok(created),
                Err(RepoError::Duplicate(msg)) => {
                    tracing::warn!("Confirmation code collision, retrying: {}", msg);
                    last_err = Some(RepoError::Duplicate(msg));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err
            .map(BookingError::from)
            .unwrap_or_else(|| BookingError::InvalidRequest("code generation failed".into())))
    }
}

fn summary_of(restaurant: &Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        name: restaurant.name.clone(),
        address: restaurant.contact.address.clone(),
        phone: restaurant.contact.phone.clone(),
        email: restaurant.contact.email.clone(),
    }
}
