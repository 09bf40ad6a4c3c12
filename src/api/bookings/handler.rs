//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatusUpdate, BookingWithRestaurant};
use crate::utils::AppResult;

/// POST /api/bookings - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    payload.validate()?;

    let service = state.booking_service();
    let booking = service.create_booking(payload).await?;
    Ok(Json(booking))
}

/// GET /api/bookings/confirm/:code - 按确认码查询
pub async fn get_by_confirmation_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<BookingWithRestaurant>> {
    let service = state.booking_service();
    let booking = service.find_by_confirmation_code(&code).await?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/bookings/restaurant/:slug - 餐厅预订列表 (可选日期范围)
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let service = state.booking_service();
    let bookings = service
        .bookings_for_restaurant(&slug, range.start_date, range.end_date)
        .await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/customer/:email - 客户未来预订
pub async fn list_for_customer(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<BookingWithRestaurant>>> {
    let service = state.booking_service();
    let bookings = service.bookings_for_customer(&email).await?;
    Ok(Json(bookings))
}

/// PATCH /api/bookings/:id/status - 状态变更
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    let service = state.booking_service();
    let booking = service.update_status(&id, payload.status).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/cancel - 取消预订
///
/// 取消立即反映到后续的占用聚合，没有任何占用缓存。
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let service = state.booking_service();
    let booking = service.cancel(&id).await?;
    Ok(Json(booking))
}
