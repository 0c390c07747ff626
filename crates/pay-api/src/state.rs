//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment strategy, pricing policy and checkout defaults.
//! Everything here is immutable after start-up.

use anyhow::Context;
use pay_core::{
    BoxedPaymentStrategy, CheckoutUrls, Currency, PriceCatalog, PricingPolicy, SessionOptions,
    TaxRate, DEFAULT_UNIT_AMOUNT,
};
use pay_stripe::{StripeCheckoutStrategy, StripeConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Pricing source selected by `PRICING_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingSource {
    Catalog,
    AdHoc,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for default redirect pages
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
    pub pricing_source: PricingSource,
    /// Explicit catalog file; searched under `config/` when unset
    pub catalog_path: Option<PathBuf>,
    /// Flat per-unit price in minor units
    pub unit_amount: i64,
    pub currency: Currency,
    pub shipping_amount: Option<i64>,
    pub tax_rate: Option<TaxRate>,
    /// `metadata[source]` attached to every session
    pub source_tag: String,
    /// ISO country codes for shipping address collection
    pub shipping_countries: Vec<String>,
    pub collect_phone: bool,
    pub log_format: LogFormat,
}

/// Start-up configuration, read from one variable source
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub stripe: StripeConfig,
}

impl Settings {
    /// Load from environment variables, with `.env` if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let app = AppConfig::from_lookup(&lookup)?;
        let stripe = StripeConfig::from_lookup(&lookup)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        Ok(Self { app, stripe })
    }
}

impl AppConfig {
    /// Load through an arbitrary variable lookup; unset variables take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT is not a valid port: {p}"))?,
            None => 3000,
        };

        let pricing_source = match var("PRICING_MODE").as_deref() {
            None | Some("catalog") => PricingSource::Catalog,
            Some("adhoc") | Some("ad-hoc") => PricingSource::AdHoc,
            Some(other) => anyhow::bail!("PRICING_MODE must be catalog or adhoc, got {other}"),
        };

        let unit_amount = match var("UNIT_AMOUNT") {
            Some(a) => parse_amount("UNIT_AMOUNT", &a)?,
            None => DEFAULT_UNIT_AMOUNT,
        };

        let shipping_amount = var("SHIPPING_AMOUNT")
            .map(|a| parse_amount("SHIPPING_AMOUNT", &a))
            .transpose()?;

        let currency = match var("CURRENCY") {
            Some(c) => c.parse::<Currency>()?,
            None => Currency::USD,
        };

        let tax_rate = var("TAX_RATE").map(|r| r.parse::<TaxRate>()).transpose()?;

        let collect_phone = match var("COLLECT_PHONE").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => anyhow::bail!("COLLECT_PHONE must be true or false, got {other}"),
        };

        let shipping_countries = var("SHIPPING_COUNTRIES")
            .map(|list| {
                list.split(',')
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            base_url: var("BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            success_url: var("SUCCESS_URL"),
            cancel_url: var("CANCEL_URL"),
            pricing_source,
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            unit_amount,
            currency,
            shipping_amount,
            tax_rate,
            source_tag: var("CHECKOUT_SOURCE").unwrap_or_else(|| "storefront".to_string()),
            shipping_countries,
            collect_phone,
            log_format,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default redirect URLs
    pub fn checkout_urls(&self) -> CheckoutUrls {
        let mut urls = CheckoutUrls::new(&self.base_url);
        if let Some(url) = &self.success_url {
            urls = urls.with_success_url(url);
        }
        if let Some(url) = &self.cancel_url {
            urls = urls.with_cancel_url(url);
        }
        urls
    }

    /// Collection options passed through to the processor
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            shipping_countries: self.shipping_countries.clone(),
            collect_phone_number: self.collect_phone,
            ..SessionOptions::default()
        }
    }

    /// Build the pricing policy, loading the catalog in catalog mode
    pub fn pricing_policy(&self) -> anyhow::Result<PricingPolicy> {
        let mut policy = match self.pricing_source {
            PricingSource::Catalog => {
                PricingPolicy::catalog(load_price_catalog(self.catalog_path.as_deref())?)
            }
            PricingSource::AdHoc => PricingPolicy::ad_hoc(),
        }
        .with_unit_amount(self.unit_amount)
        .with_currency(self.currency);

        if let Some(amount) = self.shipping_amount {
            policy = policy.with_shipping(amount);
        }
        if let Some(rate) = self.tax_rate {
            policy = policy.with_tax(rate);
        }
        Ok(policy)
    }
}

fn parse_amount(name: &str, raw: &str) -> anyhow::Result<i64> {
    let amount: i64 = raw
        .parse()
        .with_context(|| format!("{name} must be a whole number of minor units, got {raw}"))?;
    if amount < 0 {
        anyhow::bail!("{name} must not be negative, got {amount}");
    }
    Ok(amount)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor capability
    pub strategy: BoxedPaymentStrategy,
    /// Pricing rules and catalog
    pub pricing: Arc<PricingPolicy>,
    /// Default redirect URLs
    pub urls: Arc<CheckoutUrls>,
    /// Session collection options
    pub session_options: Arc<SessionOptions>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let Settings { app, stripe } = settings;
        let pricing = app.pricing_policy()?;

        if stripe.is_live_mode() && !app.is_production() {
            tracing::warn!("Live Stripe key in {} environment", app.environment);
        }

        let stripe_strategy = StripeCheckoutStrategy::new(stripe)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::from_parts(app, pricing, Arc::new(stripe_strategy)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        pricing: PricingPolicy,
        strategy: BoxedPaymentStrategy,
    ) -> Self {
        Self {
            strategy,
            pricing: Arc::new(pricing),
            urls: Arc::new(config.checkout_urls()),
            session_options: Arc::new(config.session_options()),
            config: Arc::new(config),
        }
    }

    /// Metadata attached to every session
    pub fn session_metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("source".to_string(), self.config.source_tag.clone())])
    }
}

/// Load price catalog from a file, or search the usual config locations
fn load_price_catalog(path: Option<&Path>) -> anyhow::Result<PriceCatalog> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = PriceCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/catalog.toml",
        "../config/catalog.toml",
        "../../config/catalog.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = PriceCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} catalog entries from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    anyhow::bail!("PRICING_MODE=catalog but no catalog found; set CATALOG_PATH or add config/catalog.toml")
}
