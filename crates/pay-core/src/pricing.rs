//! # Cart Pricing
//!
//! Turns validated cart items into the ordered line-item list sent to the
//! payment processor: cart items first (input order), then shipping, then tax.

use crate::cart::CartItem;
use crate::catalog::PriceCatalog;
use crate::checkout::LineItem;
use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Money, TaxRate};
use std::sync::Arc;

/// Flat per-unit price used when no better price is known (minor units)
pub const DEFAULT_UNIT_AMOUNT: i64 = 3000;

/// Where line-item prices come from
#[derive(Debug, Clone)]
pub enum PricingMode {
    /// Styles must resolve to pre-registered processor prices
    Catalog(Arc<PriceCatalog>),
    /// Every style is priced inline at the flat unit amount
    AdHoc,
}

impl PricingMode {
    pub fn name(&self) -> &'static str {
        match self {
            PricingMode::Catalog(_) => "catalog",
            PricingMode::AdHoc => "adhoc",
        }
    }
}

/// Static pricing rules, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    pub mode: PricingMode,
    /// Flat per-unit price in minor units
    pub unit_amount: i64,
    /// Currency of inline prices
    pub currency: Currency,
    /// Flat shipping fee in minor units
    pub shipping_amount: Option<i64>,
    pub tax_rate: Option<TaxRate>,
}

impl PricingPolicy {
    /// Catalog pricing with no shipping or tax
    pub fn catalog(catalog: PriceCatalog) -> Self {
        Self {
            mode: PricingMode::Catalog(Arc::new(catalog)),
            unit_amount: DEFAULT_UNIT_AMOUNT,
            currency: Currency::USD,
            shipping_amount: None,
            tax_rate: None,
        }
    }

    /// Ad-hoc pricing with no shipping or tax
    pub fn ad_hoc() -> Self {
        Self {
            mode: PricingMode::AdHoc,
            unit_amount: DEFAULT_UNIT_AMOUNT,
            currency: Currency::USD,
            shipping_amount: None,
            tax_rate: None,
        }
    }

    /// Builder: set the flat unit amount
    pub fn with_unit_amount(mut self, amount: i64) -> Self {
        self.unit_amount = amount;
        self
    }

    /// Builder: set the inline currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Builder: add a flat shipping fee
    pub fn with_shipping(mut self, amount: i64) -> Self {
        self.shipping_amount = Some(amount);
        self
    }

    /// Builder: add sales tax
    pub fn with_tax(mut self, rate: TaxRate) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    /// Price a cart.
    ///
    /// Every item is resolved before anything is returned, so an unknown
    /// style fails the whole cart.
    pub fn price(&self, items: &[CartItem]) -> PaymentResult<PricedCart> {
        if items.is_empty() {
            return Err(PaymentError::EmptyCart);
        }

        let mut line_items = Vec::with_capacity(items.len() + 2);
        let mut subtotal: i64 = 0;

        for item in items {
            let (line_item, unit_amount) = match &self.mode {
                PricingMode::Catalog(catalog) => {
                    let entry = catalog.resolve(&item.style)?;
                    (
                        LineItem::reference(&entry.price_id, item.quantity),
                        entry.unit_amount.unwrap_or(self.unit_amount),
                    )
                }
                PricingMode::AdHoc => (
                    LineItem::inline(
                        &item.style,
                        Money::new(self.unit_amount, self.currency),
                        item.quantity,
                    ),
                    self.unit_amount,
                ),
            };

            subtotal = unit_amount
                .checked_mul(i64::from(item.quantity))
                .and_then(|line_total| subtotal.checked_add(line_total))
                .ok_or_else(|| PaymentError::InvalidRequest("cart total is too large".to_string()))?;

            line_items.push(line_item);
        }

        if let Some(amount) = self.shipping_amount {
            line_items.push(
                LineItem::inline("Shipping Fee", Money::new(amount, self.currency), 1)
                    .with_description("Standard shipping"),
            );
        }

        let tax = match self.tax_rate {
            Some(rate) => {
                let tax = rate.apply(subtotal)?;
                line_items.push(
                    LineItem::inline(rate.label(), Money::new(tax, self.currency), 1)
                        .with_description("Sales tax"),
                );
                Some(tax)
            }
            None => None,
        };

        Ok(PricedCart {
            line_items,
            subtotal,
            shipping: self.shipping_amount,
            tax,
            currency: self.currency,
        })
    }
}

/// Result of pricing a cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    /// Cart items, then shipping, then tax
    pub line_items: Vec<LineItem>,
    pub subtotal: i64,
    pub shipping: Option<i64>,
    pub tax: Option<i64>,
    pub currency: Currency,
}

impl PricedCart {
    /// subtotal + shipping + tax
    pub fn total(&self) -> Money {
        let amount = self
            .subtotal
            .saturating_add(self.shipping.unwrap_or(0))
            .saturating_add(self.tax.unwrap_or(0));
        Money::new(amount, self.currency)
    }
}
