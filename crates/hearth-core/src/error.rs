//! # Error Types
//!
//! Domain-specific error types for hearth-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hearth-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ConfigError      - Invalid pricing / shipping configuration       │
//! │                                                                         │
//! │  hearth-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── AppError         - What the CLI / display layer sees              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order total calculator has no error type at all: it clamps bad input
//! instead of failing, so a live price display never blocks.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart has no line for this product.
    #[error("Product {0} is not in the cart")]
    LineNotInCart(String),

    /// Cart has exceeded maximum allowed distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Payment amount is invalid.
    ///
    /// ## When This Occurs
    /// - Grand total is zero or negative when building a provider redirect
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error (wraps ConfigError).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the upstream form helpers in [`crate::validation`], never by the
/// calculator.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Pricing and shipping configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A destination zone has no rate brackets.
    #[error("No shipping rates configured for zone {zone}")]
    MissingZoneRates { zone: String },

    /// A rate bracket is unusable.
    #[error("Invalid rate bracket in zone {zone}: {reason}")]
    InvalidBracket { zone: String, reason: String },

    /// A setting has an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1200 exceeds maximum allowed (999)");

        let err = ConfigError::MissingZoneRates {
            zone: "north_america".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No shipping rates configured for zone north_america"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "sku".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = ConfigError::Parse("bad".to_string()).into();
        assert!(matches!(core_err, CoreError::Config(_)));
    }
}
