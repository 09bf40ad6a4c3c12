//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅信息、预订配置、可用性查询
//! - [`bookings`] - 预订创建、查询、取消
//! - [`gift_cards`] - 礼品卡购买、核销

pub mod bookings;
pub mod gift_cards;
pub mod health;
pub mod restaurants;

use crate::core::ServerState;
use axum::Router;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(bookings::router())
        .merge(gift_cards::router())
}
