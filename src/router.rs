//! HTTP route table.

use crate::handlers::{health, orders, tokens};
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the HTTP surface under its `/api/orderbook` mount point.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/tokens", get(tokens::get_tokens))
        .route(
            "/orders",
            get(orders::get_order_book).post(orders::place_order),
        )
        .route("/health", get(health::health))
        .route("/ready", get(health::ready));

    Router::new()
        .nest("/api/orderbook", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
