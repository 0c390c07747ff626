//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /create-checkout-session - Create checkout session
/// - POST /api/create-checkout-session - Same handler, serverless path
/// - GET  /health - Health check
///
/// Every `OPTIONS` request is answered by the CORS layer with 200 and an
/// empty body; it never reaches a handler.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Checkout
        .route("/create-checkout-session", checkout_route())
        .route("/api/create-checkout-session", checkout_route())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

/// POST creates a session, anything else that gets past CORS is 405
fn checkout_route() -> MethodRouter<AppState> {
    post(handlers::create_checkout_session).fallback(handlers::method_not_allowed)
}
