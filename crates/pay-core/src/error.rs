//! # Payment Error Types
//!
//! Typed error handling for the checkout service.
//! All cart, pricing and payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `cart_items` missing, not an array, or empty
    #[error("No items in cart")]
    EmptyCart,

    /// A cart entry is malformed
    #[error("Invalid cart item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    /// Style has no catalog entry
    #[error("Product not found for style: {style}")]
    UnknownStyle { style: String },

    /// Checkout mode other than payment/subscription
    #[error("Unsupported checkout mode: {mode}")]
    UnsupportedMode { mode: String },

    /// Any other invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Payment provider rejected the request
    #[error("Provider error [{provider}] (HTTP {status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        /// Provider error type, e.g. `invalid_request_error`
        kind: Option<String>,
        /// Provider error code, e.g. `resource_missing`
        code: Option<String>,
        message: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Provider response could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if the caller caused this error (bad input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::EmptyCart
                | PaymentError::InvalidItem { .. }
                | PaymentError::UnknownStyle { .. }
                | PaymentError::UnsupportedMode { .. }
                | PaymentError::InvalidRequest(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    ///
    /// Everything that is not the caller's fault maps to 500; provider
    /// statuses are never passed through.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

/// Result type alias for checkout operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PaymentError::EmptyCart.is_client_error());
        assert!(PaymentError::UnknownStyle {
            style: "Style 9".into()
        }
        .is_client_error());
        assert!(!PaymentError::Network("timeout".into()).is_client_error());
        assert!(!PaymentError::Configuration("missing key".into()).is_client_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::EmptyCart.status_code(), 400);
        assert_eq!(
            PaymentError::InvalidItem {
                index: 0,
                reason: "quantity must be at least 1".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            PaymentError::Provider {
                provider: "stripe".into(),
                status: 402,
                kind: Some("card_error".into()),
                code: None,
                message: "declined".into(),
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_unknown_style_message_names_style() {
        let err = PaymentError::UnknownStyle {
            style: "Style 9".into(),
        };
        assert_eq!(err.to_string(), "Product not found for style: Style 9");
    }
}
