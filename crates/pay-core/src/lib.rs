//! # pay-core
//!
//! Core types and traits for the storefront checkout service.
//!
//! This crate provides:
//! - `CartItem` and `parse_cart_items` for validating storefront carts
//! - `PriceCatalog` mapping styles to processor price references
//! - `PricingPolicy` for turning a cart into priced line items
//! - `SessionRequest` and `CheckoutSession` for the checkout flow
//! - `PaymentStrategy` trait for implementing payment providers
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{parse_cart_items, CheckoutMode, PricingPolicy, SessionRequest};
//!
//! let items = parse_cart_items(payload.get("cart_items"))?;
//! let priced = PricingPolicy::catalog(catalog).with_shipping(500).price(&items)?;
//!
//! let session = strategy
//!     .create_session(&SessionRequest {
//!         line_items: priced.line_items,
//!         mode: CheckoutMode::Payment,
//!         success_url,
//!         cancel_url,
//!         metadata,
//!         options: Default::default(),
//!     })
//!     .await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod strategy;

// Re-exports for convenience
pub use cart::{parse_cart_items, CartItem};
pub use catalog::{CatalogEntry, PriceCatalog};
pub use checkout::{
    CheckoutMode, CheckoutSession, LineItem, LinePrice, SessionOptions, SessionRequest,
};
pub use error::{PaymentError, PaymentResult};
pub use money::{Currency, Money, TaxRate};
pub use pricing::{PricedCart, PricingMode, PricingPolicy, DEFAULT_UNIT_AMOUNT};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
