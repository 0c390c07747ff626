//! # Money Types
//!
//! Currencies, amounts in minor units and tax rates.
//! All arithmetic happens on integer minor units; tax uses decimal math.

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF ",
            Currency::MXN => "MX$",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            "chf" => Ok(Currency::CHF),
            "mxn" => Ok(Currency::MXN),
            other => Err(PaymentError::Configuration(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// An amount in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        let symbol = self.currency.symbol();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        match self.currency.decimal_places() {
            0 => format!("{sign}{symbol}{abs}"),
            places => {
                let scale = 10_u64.pow(places);
                format!(
                    "{sign}{symbol}{}.{:0width$}",
                    abs / scale,
                    abs % scale,
                    width = places as usize
                )
            }
        }
    }
}

/// Sales tax rate as a decimal fraction (`0.10` is 10%)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Create a rate, rejecting values outside `0..=1`
    pub fn new(rate: Decimal) -> PaymentResult<Self> {
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(PaymentError::Configuration(format!(
                "tax rate must be between 0 and 1, got {rate}"
            )));
        }
        Ok(Self(rate))
    }

    /// Tax owed on `subtotal` minor units, rounded half-up to a whole unit
    pub fn apply(&self, subtotal: i64) -> PaymentResult<i64> {
        let tax = Decimal::from(subtotal)
            .checked_mul(self.0)
            .ok_or_else(|| PaymentError::InvalidRequest("cart total is too large".to_string()))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        tax.to_i64()
            .ok_or_else(|| PaymentError::InvalidRequest("cart total is too large".to_string()))
    }

    /// Line item label, e.g. "Tax (10%)"
    pub fn label(&self) -> String {
        format!("Tax ({}%)", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

impl FromStr for TaxRate {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim()).map_err(|e| {
            PaymentError::Configuration(format!("invalid tax rate {s:?}: {e}"))
        })?;
        Self::new(rate)
    }
}
