//! # Validation Module
//!
//! Input validation utilities for the ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Type validation (JSON / query deserialization)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── quantities, prices, required text                                 │
//! │  └── runs before any write is attempted                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints (unknown product, channel, ...)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text value accepted (names, notes, descriptions).
pub const MAX_TEXT_LEN: usize = 200;

/// Date format used by filters: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Must contain something other than whitespace
/// - At most [`MAX_TEXT_LEN`] characters
///
/// The value itself is left untouched. Stock identity is the exact string,
/// so `"Leite"` and `"Leite "` stay different products.
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Normalizes an optional free-text field: blank becomes `None`.
pub fn optional_text(field: &str, value: Option<String>) -> ValidationResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        other => Ok(other),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line or add-on quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock quantity (movements and purchases).
pub fn validate_stock_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

/// Validates a price or cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free add-ons, donated stock)
///
/// ## Example
/// ```rust
/// use acai_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("unit_price", 1800).is_ok());
/// assert!(validate_price_cents("unit_price", 0).is_ok());
/// assert!(validate_price_cents("unit_price", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Rejects a unit cost whose `unit_cost × qty` does not fit in i64 cents.
pub fn validate_total_cost(unit_cost: Money, qty: Quantity) -> ValidationResult<()> {
    if unit_cost.checked_times_quantity(qty).is_none() {
        return Err(ValidationError::OutOfRange {
            field: "total_cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates an amount that must be strictly positive (expenses).
pub fn validate_positive_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

/// Resolves an optional row limit: missing means `default`, otherwise
/// clamped to `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` calendar date.
///
/// ## Example
/// ```rust
/// use acai_core::validation::parse_date;
///
/// assert!(parse_date("from", "2024-05-01").is_ok());
/// assert!(parse_date("from", "01/05/2024").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("product_name", "Leite").is_ok());
        assert!(validate_required_text("product_name", "").is_err());
        assert!(validate_required_text("product_name", "   ").is_err());
        assert!(validate_required_text("product_name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("note", None).unwrap(), None);
        assert_eq!(optional_text("note", Some("  ".into())).unwrap(), None);
        assert_eq!(
            optional_text("note", Some("sem granola".into())).unwrap(),
            Some("sem granola".to_string())
        );
        assert!(optional_text("note", Some("x".repeat(201))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(Quantity::from_milli(1)).is_ok());
        assert!(validate_stock_quantity(Quantity::zero()).is_err());
        assert!(validate_stock_quantity(Quantity::from_units(-2)).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_price_cents("delivery_fee", 0).is_ok());
        assert!(validate_price_cents("delivery_fee", -1).is_err());
        assert!(validate_positive_amount("amount", 1).is_ok());
        assert!(validate_positive_amount("amount", 0).is_err());
    }

    #[test]
    fn test_validate_total_cost() {
        let cost = Money::from_cents(250);
        assert!(validate_total_cost(cost, Quantity::from_units(10)).is_ok());
        assert!(validate_total_cost(Money::from_cents(i64::MAX), Quantity::from_units(1)).is_ok());

        let err = validate_total_cost(Money::from_cents(i64::MAX), Quantity::from_units(2)).unwrap_err();
        assert_eq!(err.to_string(), format!("total_cost must be between 0 and {}", i64::MAX));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 500, 1000), 500);
        assert_eq!(clamp_limit(Some(20), 500, 1000), 20);
        assert_eq!(clamp_limit(Some(0), 500, 1000), 1);
        assert_eq!(clamp_limit(Some(5000), 500, 1000), 1000);
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("to", "2024-05-31").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert!(parse_date("to", "2024-02-30").is_err());
        assert!(parse_date("to", "yesterday").is_err());
    }
}
