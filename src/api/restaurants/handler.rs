//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::booking::DayAvailability;
use crate::core::ServerState;
use crate::db::models::{BookingConfigUpdate, Restaurant};
use crate::db::repository::RestaurantRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/restaurants/:slug - 获取餐厅文档
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .find_by_slug(&slug)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", slug)))?;
    Ok(Json(restaurant))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

/// GET /api/restaurants/:slug/availability?date=YYYY-MM-DD - 可用性投影
pub async fn availability(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<DayAvailability>> {
    let service = state.booking_service();
    let day = service.availability(&slug, query.date).await?;
    Ok(Json(day))
}

/// PUT /api/restaurants/:slug/booking-config - 整体替换预订配置
///
/// 唯一的配置变更入口：校验失败整体拒绝，不做部分更新。
pub async fn update_booking_config(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<BookingConfigUpdate>,
) -> AppResult<Json<Restaurant>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .update_booking_config(&slug, payload.booking_config)
        .await
        .map_err(AppError::from)?;
    Ok(Json(restaurant))
}
