//! # pay-stripe
//!
//! Stripe payment strategy for the storefront checkout service.
//!
//! `StripeCheckoutStrategy` opens Stripe-hosted Checkout Sessions:
//! - Catalog line items by price reference (`price_...`)
//! - Inline line items for shipping, tax and ad-hoc charges
//! - Session metadata and shipping/phone collection options
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::{StripeCheckoutStrategy, StripeConfig};
//! use pay_core::PaymentStrategy;
//!
//! // Create strategy from a variable lookup
//! let config = StripeConfig::from_lookup(|key| std::env::var(key).ok())?;
//! let strategy = StripeCheckoutStrategy::new(config)?;
//!
//! // Create checkout session
//! let session = strategy.create_session(&request).await?;
//!
//! // Hand session.session_id back to the storefront
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
