//! # Validation Module
//!
//! Checks for catalog edits and checkout forms.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Catalog / checkout form                                                │
//! │  └── THIS MODULE: reject bad input with a message for the user         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Order total calculator                                                 │
//! │  └── never rejects; clamps whatever slipped through                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Database (SQLite)                                                      │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE sku                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hearth_core::validation::{validate_country_code, validate_quantity};
//!
//! assert_eq!(validate_country_code(" ca ").unwrap(), "CA");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PARCEL_WEIGHT_KG};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use hearth_core::validation::validate_sku;
///
/// assert!(validate_sku("PINE-CAR-KIT").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// Empty is allowed (lists everything). Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates and normalises an ISO 3166-1 alpha-2 country code.
///
/// Returns the uppercase code.
pub fn validate_country_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "country".to_string(),
        });
    }

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "country".to_string(),
            reason: "must be a two-letter ISO country code".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
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

/// Validates a price in cents. Zero is allowed (giveaways).
///
/// ## Example
/// ```rust
/// use hearth_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(3500).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a catalog weight in kilograms.
///
/// `None` is accepted: the calculator substitutes the fallback weight.
/// A known weight must be finite, positive and at most
/// [`MAX_PARCEL_WEIGHT_KG`].
pub fn validate_weight_kg(weight_kg: Option<f64>) -> ValidationResult<()> {
    let Some(kg) = weight_kg else {
        return Ok(());
    };

    if !kg.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "weight".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if kg <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "weight".to_string(),
        });
    }

    if kg > MAX_PARCEL_WEIGHT_KG as f64 {
        return Err(ValidationError::OutOfRange {
            field: "weight".to_string(),
            min: 0,
            max: MAX_PARCEL_WEIGHT_KG,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string (order and product ids).
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("PINE-CAR-KIT").is_ok());
        assert!(validate_sku("bowl_walnut_12").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Hand-thrown Mug").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  bowl ").unwrap(), "bowl");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_country_code() {
        assert_eq!(validate_country_code("us").unwrap(), "US");
        assert!(validate_country_code("").is_err());
        assert!(validate_country_code("USA").is_err());
        assert!(validate_country_code("1A").is_err());
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
    fn test_validate_weight_kg() {
        assert!(validate_weight_kg(None).is_ok());
        assert!(validate_weight_kg(Some(0.8)).is_ok());

        assert!(validate_weight_kg(Some(0.0)).is_err());
        assert!(validate_weight_kg(Some(-1.0)).is_err());
        assert!(validate_weight_kg(Some(f64::NAN)).is_err());
        assert!(validate_weight_kg(Some(500.0)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
