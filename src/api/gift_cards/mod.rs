//! Gift Card API 模块

mod handler;

use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/gift-cards", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/payment-intent", post(handler::create_payment_intent))
        .route("/confirm", post(handler::confirm))
        .route("/verify/{code}", get(handler::verify))
        .route("/redeem", post(handler::redeem))
        .route("/{id}/use", put(handler::mark_used))
}
