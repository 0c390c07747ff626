//! # Storefront Checkout
//!
//! Creates hosted checkout sessions for the storefront cart.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PRICING_MODE=catalog
//!
//! # Run the server
//! checkout-server
//! ```

use pay_api::{
    routes,
    state::{AppState, LogFormat, Settings},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    let log_format = settings.app.log_format;

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    match log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    // Print banner
    if log_format == LogFormat::Pretty {
        print_banner();
    }

    let addr = settings.app.socket_addr()?;
    let is_prod = settings.app.is_production();

    // Initialize application state
    let state = AppState::new(settings)?;

    info!("Environment: {}", state.config.environment);
    info!("Pricing mode: {}", state.pricing.mode.name());
    info!("Payment provider: {}", state.strategy.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Checkout server starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront Checkout
  ━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
