//! Restaurant API 模块

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{slug}", get(handler::get_by_slug))
        .route("/{slug}/availability", get(handler::availability))
        .route("/{slug}/booking-config", put(handler::update_booking_config))
}
