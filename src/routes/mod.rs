//! HTTP route handlers.
//!
//! `/health` is the liveness probe and `/cr` is the ConversationRelay socket.
//! Every request passes through the request ID middleware so logs emitted
//! while handling it can be correlated.

pub mod health;
pub mod relay;

use axum::{http::Uri, middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Probes must always see a fresh answer
const CACHE_CONTROL_HEALTH: &str = "no-store";

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    let relay_routes = Router::new().route("/cr", get(relay::upgrade));

    Router::new()
        .merge(health_routes)
        .merge(relay_routes)
        .fallback(not_found)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
