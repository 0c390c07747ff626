//! # Cart Types
//!
//! Cart items as posted by the storefront, and their validation.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A style and quantity selected by the shopper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog style identifier (e.g., "Style 1")
    pub style: String,
    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartItem {
    pub fn new(style: impl Into<String>, quantity: u32) -> Self {
        Self {
            style: style.into(),
            quantity,
        }
    }
}

/// Validate the raw `cart_items` value of a checkout payload.
///
/// The value is taken untyped so that a missing field, a non-array and an
/// empty array all produce [`PaymentError::EmptyCart`], and each malformed
/// entry is reported with its index.
pub fn parse_cart_items(raw: Option<&Value>) -> PaymentResult<Vec<CartItem>> {
    let entries = match raw {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(PaymentError::EmptyCart),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_cart_item(index, entry))
        .collect()
}

fn parse_cart_item(index: usize, entry: &Value) -> PaymentResult<CartItem> {
    let invalid = |reason: &str| PaymentError::InvalidItem {
        index,
        reason: reason.to_string(),
    };

    let obj = entry
        .as_object()
        .ok_or_else(|| invalid("expected an object with style and quantity"))?;

    let style = match obj.get("style") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => return Err(invalid("style must not be empty")),
        Some(_) => return Err(invalid("style must be a string")),
        None => return Err(invalid("missing style")),
    };

    let quantity = match obj.get("quantity") {
        None | Some(Value::Null) => return Err(invalid("missing quantity")),
        Some(Value::Number(n)) => {
            if let Some(q) = n.as_u64() {
                q
            } else if n.as_i64().is_some() {
                return Err(invalid("quantity must be at least 1"));
            } else {
                return Err(invalid("quantity must be a whole number"));
            }
        }
        Some(_) => return Err(invalid("quantity must be a number")),
    };

    if quantity == 0 {
        return Err(invalid("quantity must be at least 1"));
    }

    let quantity = u32::try_from(quantity).map_err(|_| invalid("quantity is too large"))?;

    Ok(CartItem { style, quantity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> PaymentResult<Vec<CartItem>> {
        parse_cart_items(Some(&value))
    }

    #[test]
    fn test_parse_valid_items_preserves_order() {
        let items = parse(json!([
            { "style": "Style 2", "quantity": 1 },
            { "style": "Style 1", "quantity": 3 }
        ]))
        .unwrap();

        assert_eq!(
            items,
            vec![CartItem::new("Style 2", 1), CartItem::new("Style 1", 3)]
        );
    }

    #[test]
    fn test_missing_or_empty_cart() {
        assert!(matches!(parse_cart_items(None), Err(PaymentError::EmptyCart)));
        assert!(matches!(parse(json!([])), Err(PaymentError::EmptyCart)));
        assert!(matches!(parse(json!("Style 1")), Err(PaymentError::EmptyCart)));
        assert!(matches!(parse(json!({ "style": "Style 1" })), Err(PaymentError::EmptyCart)));
        assert!(matches!(parse(Value::Null), Err(PaymentError::EmptyCart)));
    }

    #[test]
    fn test_invalid_quantities() {
        for bad in [json!(0), json!(-2), json!(1.5), json!("2"), json!(null), json!(5_000_000_000_u64)] {
            let err = parse(json!([{ "style": "Style 1", "quantity": bad }])).unwrap_err();
            assert!(
                matches!(err, PaymentError::InvalidItem { index: 0, .. }),
                "unexpected error for {bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_style_reports_index() {
        let err = parse(json!([
            { "style": "Style 1", "quantity": 1 },
            { "style": "  ", "quantity": 1 }
        ]))
        .unwrap_err();

        match err {
            PaymentError::InvalidItem { index, reason } => {
                assert_eq!(index, 1);
                assert_eq!(reason, "style must not be empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            parse(json!([{ "style": 7, "quantity": 1 }])),
            Err(PaymentError::InvalidItem { index: 0, .. })
        ));
        assert!(matches!(
            parse(json!(["Style 1"])),
            Err(PaymentError::InvalidItem { index: 0, .. })
        ));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let payload = json!([{ "style": "Style 1", "quantity": 0 }]);
        let first = parse(payload.clone()).unwrap_err().to_string();
        let second = parse(payload).unwrap_err().to_string();
        assert_eq!(first, second);
    }
}
