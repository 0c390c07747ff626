//! # pay-api
//!
//! HTTP API layer for the storefront checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout-session endpoint used by the storefront cart page
//! - Environment-driven configuration
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | POST | `/api/create-checkout-session` | Same, serverless path |
//! | OPTIONS | any path | Answered by the CORS layer |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, Settings};
