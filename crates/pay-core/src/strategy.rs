//! # Payment Strategy Trait
//!
//! The seam between the checkout handler and the payment processor.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PaymentStrategy (trait)             │
//! │  ├── create_session(&SessionRequest)         │
//! │  └── provider_name()                         │
//! └──────────────────────────────────────────────┘
//!                     ▲
//!          ┌──────────┴──────────┐
//!  ┌───────┴───────┐     ┌───────┴───────┐
//!  │StripeCheckout │     │  test doubles │
//!  │   Strategy    │     │               │
//!  └───────────────┘     └───────────────┘
//! ```

use crate::checkout::{CheckoutSession, SessionRequest};
use crate::error::PaymentResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Capability to open a hosted checkout session with a payment processor.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a checkout session.
    ///
    /// # Arguments
    /// * `request` - Priced line items, mode, redirect URLs and metadata
    ///
    /// # Returns
    /// The provider's `CheckoutSession`, or a `PaymentError` describing why
    /// the provider refused or could not be reached.
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Default redirect URLs used when a request does not supply its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutUrls {
    /// Defaults under a base URL: `/success.html` and `/cancel.html`
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            success_url: format!("{base}/success.html"),
            cancel_url: format!("{base}/cancel.html"),
        }
    }

    /// Builder: override the success URL
    pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = url.into();
        self
    }

    /// Builder: override the cancel URL
    pub fn with_cancel_url(mut self, url: impl Into<String>) -> Self {
        self.cancel_url = url.into();
        self
    }

    /// Pick request-supplied URLs, falling back to the defaults when absent or blank
    pub fn resolve(&self, success_url: Option<&str>, cancel_url: Option<&str>) -> (String, String) {
        let pick = |requested: Option<&str>, default: &str| {
            requested
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        (
            pick(success_url, &self.success_url),
            pick(cancel_url, &self.cancel_url),
        )
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://shop.example.com/");

        assert_eq!(urls.success_url, "https://shop.example.com/success.html");
        assert_eq!(urls.cancel_url, "https://shop.example.com/cancel.html");
    }

    #[test]
    fn test_resolve_prefers_request_urls() {
        let urls = CheckoutUrls::default();

        let (success, cancel) =
            urls.resolve(Some("https://a.example/ok"), Some("https://a.example/no"));
        assert_eq!(success, "https://a.example/ok");
        assert_eq!(cancel, "https://a.example/no");

        let (success, cancel) = urls.resolve(None, Some(""));
        assert_eq!(success, "http://localhost:3000/success.html");
        assert_eq!(cancel, "http://localhost:3000/cancel.html");
    }
}
