//! # Checkout Types
//!
//! Line items, session requests and checkout sessions.

use crate::error::PaymentError;
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How a line item is priced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LinePrice {
    /// Price registered with the processor ahead of time
    Reference { price_id: String },
    /// Price described inline (shipping, tax, ad-hoc items)
    Inline {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        unit_amount: i64,
        currency: Currency,
    },
}

/// A line item sent to the payment processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price: LinePrice,
    pub quantity: u32,
}

impl LineItem {
    /// Line item referencing a catalog price
    pub fn reference(price_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            price: LinePrice::Reference {
                price_id: price_id.into(),
            },
            quantity,
        }
    }

    /// Line item with an inline price
    pub fn inline(name: impl Into<String>, unit: Money, quantity: u32) -> Self {
        Self {
            price: LinePrice::Inline {
                name: name.into(),
                description: None,
                unit_amount: unit.amount,
                currency: unit.currency,
            },
            quantity,
        }
    }

    /// Builder: set the description of an inline price (no-op for references)
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        if let LinePrice::Inline {
            ref mut description,
            ..
        } = self.price
        {
            *description = Some(desc.into());
        }
        self
    }

    /// Inline unit amount, if the price is described inline
    pub fn inline_amount(&self) -> Option<i64> {
        match &self.price {
            LinePrice::Inline { unit_amount, .. } => Some(*unit_amount),
            LinePrice::Reference { .. } => None,
        }
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    Payment,
    /// Subscription
    Subscription,
}

impl Default for CheckoutMode {
    fn default() -> Self {
        CheckoutMode::Payment
    }
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }

    /// Parse an optional request value; absent or blank means one-time payment
    pub fn from_request(mode: Option<&str>) -> Result<Self, PaymentError> {
        match mode.map(str::trim) {
            None | Some("") => Ok(CheckoutMode::Payment),
            Some(m) => m.parse(),
        }
    }
}

impl FromStr for CheckoutMode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(CheckoutMode::Payment),
            "subscription" => Ok(CheckoutMode::Subscription),
            other => Err(PaymentError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Processor-side collection settings passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Accepted payment method types
    pub payment_method_types: Vec<String>,
    /// Collect a shipping address restricted to these ISO country codes
    #[serde(default)]
    pub shipping_countries: Vec<String>,
    /// Collect the customer's phone number
    #[serde(default)]
    pub collect_phone_number: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            payment_method_types: vec!["card".to_string()],
            shipping_countries: Vec::new(),
            collect_phone_number: false,
        }
    }
}

/// Everything a payment strategy needs to open a checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub line_items: Vec<LineItem>,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
    /// Metadata attached to the session (origin tag, etc.)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub options: SessionOptions,
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// Hosted checkout URL, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Create a new checkout session
    pub fn new(session_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            provider: provider.into(),
            checkout_url: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_request() {
        assert_eq!(CheckoutMode::from_request(None).unwrap(), CheckoutMode::Payment);
        assert_eq!(CheckoutMode::from_request(Some("")).unwrap(), CheckoutMode::Payment);
        assert_eq!(
            CheckoutMode::from_request(Some("subscription")).unwrap(),
            CheckoutMode::Subscription
        );
        assert!(matches!(
            CheckoutMode::from_request(Some("setup")),
            Err(PaymentError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn test_inline_description() {
        let item = LineItem::inline("Shipping Fee", Money::new(500, Currency::USD), 1)
            .with_description("Standard shipping");

        match item.price {
            LinePrice::Inline { description, unit_amount, .. } => {
                assert_eq!(description.as_deref(), Some("Standard shipping"));
                assert_eq!(unit_amount, 500);
            }
            LinePrice::Reference { .. } => panic!("expected inline price"),
        }

        let reference = LineItem::reference("price_1", 2).with_description("ignored");
        assert_eq!(reference.inline_amount(), None);
    }

    #[test]
    fn test_default_options_accept_cards() {
        let options = SessionOptions::default();
        assert_eq!(options.payment_method_types, vec!["card"]);
        assert!(options.shipping_countries.is_empty());
        assert!(!options.collect_phone_number);
    }
}
