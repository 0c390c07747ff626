//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Carts are validated and priced before the payment processor is called.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::{parse_cart_items, CheckoutMode, PaymentError, SessionRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

const CHECKOUT_FAILED: &str = "Failed to create checkout session";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
///
/// `cart_items` stays untyped so every shape problem maps to a specific
/// client error instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub cart_items: Option<serde_json::Value>,
    /// `payment` (default) or `subscription`
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Processor session id, handed to the client-side redirect
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Client errors keep their message; anything else is logged and collapsed.
fn payment_error_to_response(err: PaymentError) -> ApiError {
    if err.is_client_error() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string())));
    }

    match &err {
        PaymentError::Provider {
            provider,
            status,
            kind,
            code,
            message,
        } => error!(
            provider = %provider,
            status = *status,
            kind = kind.as_deref().unwrap_or("unknown"),
            code = code.as_deref().unwrap_or("none"),
            "Payment processor rejected session: {}",
            message
        ),
        other => error!("Checkout session failed: {}", other),
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(CHECKOUT_FAILED)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.strategy.provider_name(),
        "pricing": state.pricing.mode.name(),
    }))
}

/// Create a checkout session from a storefront cart
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected checkout body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid request body").with_details(rejection.body_text())),
        )
    })?;

    let session_request = build_session_request(&state, &request).map_err(|e| {
        warn!("Rejected cart: {}", e);
        payment_error_to_response(e)
    })?;

    let session = state
        .strategy
        .create_session(&session_request)
        .await
        .map_err(payment_error_to_response)?;

    info!(
        session_id = %session.session_id,
        provider = %session.provider,
        line_items = session_request.line_items.len(),
        "Created checkout session"
    );

    Ok(Json(CreateCheckoutResponse {
        id: session.session_id,
    }))
}

/// Validate, price and assemble the processor request. No I/O.
fn build_session_request(
    state: &AppState,
    request: &CreateCheckoutRequest,
) -> Result<SessionRequest, PaymentError> {
    let items = parse_cart_items(request.cart_items.as_ref())?;
    let mode = CheckoutMode::from_request(request.mode.as_deref())?;
    let priced = state.pricing.price(&items)?;

    debug!(
        items = items.len(),
        subtotal = priced.subtotal,
        shipping = ?priced.shipping,
        tax = ?priced.tax,
        total = %priced.total().display(),
        "Priced cart"
    );

    let (success_url, cancel_url) = state
        .urls
        .resolve(request.success_url.as_deref(), request.cancel_url.as_deref());

    Ok(SessionRequest {
        line_items: priced.line_items,
        mode,
        success_url,
        cancel_url,
        metadata: state.session_metadata(),
        options: (*state.session_options).clone(),
    })
}

/// Any other method on the checkout path
pub async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
