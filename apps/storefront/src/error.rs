//! # Application Error Type
//!
//! Unified error type for the storefront's sessions, checkout and CLI
//! commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Hearth Storefront                      │
//! │                                                                         │
//! │  hearth-core                 hearth-db                 std / serde      │
//! │  ───────────                 ─────────                 ───────────      │
//! │  CoreError                   DbError                   io::Error        │
//! │  ValidationError                │                      serde_json       │
//! │  ConfigError                    │                      toml             │
//! │      │                          │                          │            │
//! │      └──────────────────────────┼──────────────────────────┘            │
//! │                                 ▼                                       │
//! │                    AppError { code, message }                           │
//! │                                 │                                       │
//! │              ┌──────────────────┴──────────────────┐                   │
//! │              ▼                                     ▼                    │
//! │   CLI (anyhow, human text)          --json (serialized code/message)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database failures are logged in full and reported to the shopper with a
//! generic message.

use serde::Serialize;
use thiserror::Error;

use hearth_core::{ConfigError, CoreError, ValidationError};
use hearth_db::DbError;

/// Error returned from storefront operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 1a2b..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for storefront responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Request conflicts with the current state (e.g. paying a cancelled order)
    BusinessLogic,

    /// Configuration file or environment is unusable
    ConfigError,

    /// Cart operation failed
    CartError,

    /// Payment redirect could not be built
    PaymentError,

    /// Internal error
    Internal,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InvalidStatus { entity, id, status } => AppError::new(
                ErrorCode::BusinessLogic,
                format!("{} {} is already {}", entity, id, status),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::Decode { field, reason } => {
                tracing::error!(field = %field, "Stored row could not be decoded: {}", reason);
                AppError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::LineNotInCart(_) | CoreError::CartTooLarge { .. } | CoreError::EmptyCart => {
                AppError::new(ErrorCode::CartError, message)
            }
            CoreError::QuantityTooLarge { .. } => AppError::new(ErrorCode::ValidationError, message),
            CoreError::InvalidPaymentAmount { .. } => AppError::new(ErrorCode::PaymentError, message),
            CoreError::Validation(e) => e.into(),
            CoreError::Config(e) => e.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::config(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Failed to parse configuration: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::validation(format!("Invalid JSON: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(format!("I/O error: {}", err))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: AppError = DbError::not_found("Order", "abc").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Order not found: abc");
    }

    #[test]
    fn test_invalid_status_is_business_logic() {
        let err: AppError = DbError::InvalidStatus {
            entity: "Order".into(),
            id: "abc".into(),
            status: "paid".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err: AppError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));
    }

    #[test]
    fn test_core_errors() {
        let err: AppError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);

        let err: AppError = CoreError::InvalidPaymentAmount {
            reason: "zero".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err: AppError = CoreError::Validation(ValidationError::Required {
            field: "country".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "country is required");
    }

    #[test]
    fn test_serializes_screaming_snake_code() {
        let err = AppError::not_found("Product", "PINE-CAR-KIT");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: PINE-CAR-KIT");
    }
}
