//! Booking API 模块

mod handler;

use axum::{Router, routing::get, routing::patch, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/confirm/{code}", get(handler::get_by_confirmation_code))
        .route("/restaurant/{slug}", get(handler::list_for_restaurant))
        .route("/customer/{email}", get(handler::list_for_customer))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", post(handler::cancel))
}
