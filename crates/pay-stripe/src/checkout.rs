//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! Stripe hosts the payment page; we only open the session.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pay_core::{
    CheckoutSession, LinePrice, PaymentError, PaymentResult, PaymentStrategy, SessionRequest,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }
}

/// Flatten a session request into Stripe's bracketed form encoding
fn session_form(request: &SessionRequest) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, method) in request.options.payment_method_types.iter().enumerate() {
        form.push((format!("payment_method_types[{i}]"), method.clone()));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        match &item.price {
            LinePrice::Reference { price_id } => {
                form.push((format!("line_items[{i}][price]"), price_id.clone()));
            }
            LinePrice::Inline {
                name,
                description,
                unit_amount,
                currency,
            } => {
                form.push((
                    format!("line_items[{i}][price_data][currency]"),
                    currency.as_str().to_string(),
                ));
                form.push((
                    format!("line_items[{i}][price_data][unit_amount]"),
                    unit_amount.to_string(),
                ));
                form.push((
                    format!("line_items[{i}][price_data][product_data][name]"),
                    name.clone(),
                ));
                if let Some(desc) = description {
                    form.push((
                        format!("line_items[{i}][price_data][product_data][description]"),
                        desc.clone(),
                    ));
                }
            }
        }
        form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }

    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    for (i, country) in request.options.shipping_countries.iter().enumerate() {
        form.push((
            format!("shipping_address_collection[allowed_countries][{i}]"),
            country.clone(),
        ));
    }

    if request.options.collect_phone_number {
        form.push(("phone_number_collection[enabled]".to_string(), "true".to_string()));
    }

    form
}

/// Translate a non-2xx Stripe response into a provider error
fn provider_error(status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) => PaymentError::Provider {
            provider: PROVIDER.to_string(),
            status,
            kind: parsed.error.kind,
            code: parsed.error.code,
            message: parsed
                .error
                .message
                .unwrap_or_else(|| "no message".to_string()),
        },
        Err(_) => PaymentError::Provider {
            provider: PROVIDER.to_string(),
            status,
            kind: None,
            code: None,
            message: format!("HTTP {status}: {body}"),
        },
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, request), fields(items = request.line_items.len(), mode = request.mode.as_str()))]
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<CheckoutSession> {
        if request.line_items.is_empty() {
            return Err(PaymentError::EmptyCart);
        }

        let form = session_form(request);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!(
            "Creating Stripe checkout session: {} form fields, idempotency_key={}",
            form.len(),
            idempotency_key
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(provider_error(status.as_u16(), &body));
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {e}"))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            session_id: session.id,
            provider: PROVIDER.to_string(),
            checkout_url: session.url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: Utc::now(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::{CheckoutMode, Currency, LineItem, Money, SessionOptions};
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> SessionRequest {
        SessionRequest {
            line_items: vec![
                LineItem::reference("price_style_1", 2),
                LineItem::inline("Shipping Fee", Money::new(500, Currency::USD), 1)
                    .with_description("Standard shipping"),
            ],
            mode: CheckoutMode::Payment,
            success_url: "https://shop.example.com/success.html".to_string(),
            cancel_url: "https://shop.example.com/cancel.html".to_string(),
            metadata: BTreeMap::from([("source".to_string(), "storefront".to_string())]),
            options: SessionOptions::default(),
        }
    }

    fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn strategy(server: &MockServer) -> StripeCheckoutStrategy {
        let config = StripeConfig::new("sk_test_abc").with_api_base_url(server.uri());
        StripeCheckoutStrategy::new(config).unwrap()
    }

    #[test]
    fn test_session_form_line_items() {
        let form = session_form(&request());

        assert_eq!(field(&form, "mode"), Some("payment"));
        assert_eq!(field(&form, "payment_method_types[0]"), Some("card"));
        assert_eq!(field(&form, "line_items[0][price]"), Some("price_style_1"));
        assert_eq!(field(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(field(&form, "line_items[1][price_data][currency]"), Some("usd"));
        assert_eq!(field(&form, "line_items[1][price_data][unit_amount]"), Some("500"));
        assert_eq!(
            field(&form, "line_items[1][price_data][product_data][name]"),
            Some("Shipping Fee")
        );
        assert_eq!(
            field(&form, "line_items[1][price_data][product_data][description]"),
            Some("Standard shipping")
        );
        assert_eq!(field(&form, "line_items[1][quantity]"), Some("1"));
        assert_eq!(field(&form, "metadata[source]"), Some("storefront"));
        assert_eq!(field(&form, "shipping_address_collection[allowed_countries][0]"), None);
        assert_eq!(field(&form, "phone_number_collection[enabled]"), None);
    }

    #[test]
    fn test_session_form_collection_options() {
        let mut req = request();
        req.mode = CheckoutMode::Subscription;
        req.options.shipping_countries = vec!["US".to_string(), "CA".to_string()];
        req.options.collect_phone_number = true;

        let form = session_form(&req);

        assert_eq!(field(&form, "mode"), Some("subscription"));
        assert_eq!(
            field(&form, "shipping_address_collection[allowed_countries][1]"),
            Some("CA")
        );
        assert_eq!(field(&form, "phone_number_collection[enabled]"), Some("true"));
    }

    #[test]
    fn test_provider_error_parsing() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"resource_missing","message":"No such price: 'price_x'","param":"line_items[0][price]"}}"#;
        match provider_error(400, body) {
            PaymentError::Provider {
                status,
                kind,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(kind.as_deref(), Some("invalid_request_error"));
                assert_eq!(code.as_deref(), Some("resource_missing"));
                assert_eq!(message, "No such price: 'price_x'");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            provider_error(502, "<html>bad gateway</html>"),
            PaymentError::Provider { status: 502, kind: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_create_session_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(header_exists("Idempotency-Key"))
            .and(body_string_contains("line_items%5B0%5D%5Bprice%5D=price_style_1"))
            .and(body_string_contains("metadata%5Bsource%5D=storefront"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123",
                "expires_at": 1_900_000_000_i64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = strategy(&server).create_session(&request()).await.unwrap();

        assert_eq!(session.session_id, "cs_test_123");
        assert_eq!(session.provider, "stripe");
        assert_eq!(
            session.checkout_url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_123")
        );
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_create_session_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid API Key provided: sk_test_***abc"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = strategy(&server).create_session(&request()).await.unwrap_err();

        assert!(matches!(err, PaymentError::Provider { status: 401, .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_create_session_unparsable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = strategy(&server).create_session(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_create_session_network_failure() {
        // Nothing listens on port 9 of localhost
        let config = StripeConfig::new("sk_test_abc").with_api_base_url("http://127.0.0.1:9");
        let strategy = StripeCheckoutStrategy::new(config).unwrap();

        let err = strategy.create_session(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Network(_)));
    }

    #[tokio::test]
    async fn test_empty_request_never_calls_stripe() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut req = request();
        req.line_items.clear();

        let err = strategy(&server).create_session(&req).await.unwrap_err();
        assert!(matches!(err, PaymentError::EmptyCart));
    }
}
