//! Input validation helpers
//!
//! Centralized text length constants, numeric limits and validation functions.

use shared::error::ErrorCode;
use shared::models::CartItem;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, customer, promotion, tenant, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, promotion code, username, color codes, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths / inline logos
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Numeric limits ──────────────────────────────────────────────────

/// Highest unit price (Rp 100.000.000)
pub const MAX_PRICE: i64 = 100_000_000;

/// Most units of one product on a cart line
pub const MAX_QUANTITY: i64 = 9_999;

/// Highest stock level a product can hold
pub const MAX_STOCK: i64 = 1_000_000;

/// Highest cart subtotal accepted for pricing
pub const MAX_ORDER_AMOUNT: i64 = 1_000_000_000_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a number lies within `min..=max`.
pub fn validate_range(value: i64, field: &str, min: i64, max: i64) -> Result<(), AppError> {
    if !(min..=max).contains(&value) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between {min} and {max}"),
        )
        .with_detail("field", field)
        .with_detail("value", value));
    }
    Ok(())
}

/// An amount computed from valid inputs no longer fits in an `i64`
pub fn amount_overflow(field: &str) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} is too large"))
        .with_detail("field", field)
}

/// Cart lines supplied by a client (promotion trial runs)
pub fn validate_cart_lines(items: &[CartItem]) -> Result<(), AppError> {
    for item in items {
        validate_range(item.price, "price", 0, MAX_PRICE)?;
        validate_range(item.quantity, "quantity", 1, MAX_QUANTITY)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Kopi Susu", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_SHORT_TEXT_LEN + 1);
        assert!(validate_required_text(&long, "phone", MAX_SHORT_TEXT_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_negative_out_of_range() {
        let err = validate_range(-1, "stock", 0, MAX_STOCK).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_range_limits() {
        assert!(validate_range(MAX_PRICE, "price", 0, MAX_PRICE).is_ok());
        let err = validate_range(MAX_PRICE + 1, "price", 0, MAX_PRICE).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(validate_range(0, "quantity", 1, MAX_QUANTITY).is_err());
    }

    #[test]
    fn test_client_cart_lines() {
        let mut item = CartItem {
            product_id: "1".into(),
            name: "Kopi".into(),
            category: "Minuman".into(),
            price: 28_000,
            image: String::new(),
            quantity: 2,
        };
        assert!(validate_cart_lines(std::slice::from_ref(&item)).is_ok());

        item.price = i64::MAX;
        let err = validate_cart_lines(std::slice::from_ref(&item)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        item.price = 1;
        item.quantity = MAX_QUANTITY + 1;
        assert!(validate_cart_lines(&[item]).is_err());
    }
}
