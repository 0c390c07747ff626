//! # Price Catalog
//!
//! Maps storefront styles to processor-side price references.
//! The catalog is produced by provisioning products with the payment
//! processor and is loaded once from `config/catalog.toml`.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A style registered with the payment processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Storefront style identifier (e.g., "Style 1")
    pub style: String,

    /// Processor price reference (e.g., "price_1SE0...")
    pub price_id: String,

    /// Processor product reference, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Unit price in minor units, when known locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_amount: Option<i64>,
}

impl CatalogEntry {
    pub fn new(style: impl Into<String>, price_id: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            price_id: price_id.into(),
            product_id: None,
            unit_amount: None,
        }
    }

    /// Builder: set known unit amount
    pub fn with_unit_amount(mut self, amount: i64) -> Self {
        self.unit_amount = Some(amount);
        self
    }
}

/// Read-only style → price mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceCatalog {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

impl PriceCatalog {
    /// Build a catalog, rejecting duplicate styles and blank references
    pub fn from_entries(entries: Vec<CatalogEntry>) -> PaymentResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.style.trim().is_empty() {
                return Err(PaymentError::Configuration(
                    "catalog entry with empty style".to_string(),
                ));
            }
            if entry.price_id.trim().is_empty() {
                return Err(PaymentError::Configuration(format!(
                    "catalog entry {} has no price_id",
                    entry.style
                )));
            }
            if matches!(entry.unit_amount, Some(amount) if amount < 0) {
                return Err(PaymentError::Configuration(format!(
                    "catalog entry {} has a negative unit_amount",
                    entry.style
                )));
            }
            if !seen.insert(entry.style.as_str()) {
                return Err(PaymentError::Configuration(format!(
                    "duplicate catalog style: {}",
                    entry.style
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> PaymentResult<Self> {
        let raw: PriceCatalog = toml::from_str(toml_str)
            .map_err(|e| PaymentError::Configuration(format!("invalid catalog: {e}")))?;
        Self::from_entries(raw.entries)
    }

    /// Find the entry for a style
    pub fn get(&self, style: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.style == style)
    }

    /// Find the entry for a style or fail with [`PaymentError::UnknownStyle`]
    pub fn resolve(&self, style: &str) -> PaymentResult<&CatalogEntry> {
        self.get(style).ok_or_else(|| PaymentError::UnknownStyle {
            style: style.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
