//! # Error Types
//!
//! Domain-specific error types for pampa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pampa-core errors (this file)                                         │
//! │  ├── CoreError        - Amount/document rule violations                 │
//! │  └── ValidationError  - Field-level input validation failures          │
//! │                                                                         │
//! │  pampa-db errors (separate crate)                                      │
//! │  └── DbError          - Persistence and register state conflicts       │
//! │                                                                         │
//! │  pampa-fiscal errors (separate crate)                                  │
//! │  └── FiscalError      - Timeout / rejection / server failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → Operator          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (the offending input, the cap, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount could not be accepted.
    ///
    /// ## When This Occurs
    /// - Opening balance text does not parse to a number
    /// - Amount is NaN or infinite
    /// - Amount is negative (amounts are unsigned magnitudes; the movement
    ///   kind carries the direction)
    ///
    /// ## User Workflow
    /// ```text
    /// Open register dialog, operator types "-50"
    ///      │
    ///      ▼
    /// Money::parse("-50")
    ///      │
    ///      ▼
    /// InvalidAmount { value: "-50", reason: "must not be negative" }
    ///      │
    ///      ▼
    /// UI shows: "Invalid amount '-50': must not be negative"
    /// ```
    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    /// A buyer document could not be classified as CUIT, DNI or generic.
    ///
    /// ## When This Occurs
    /// - Digits (after stripping separators) number neither 8 nor 11,
    ///   and the field is not empty or the literal "0"
    /// - An 11-digit number starts with a prefix outside the CUIT whitelist
    #[error("Invalid document '{input}': not a CUIT, DNI or generic buyer")]
    InvalidDocument { input: String },

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A cart update referenced a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    ItemNotInCart(String),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidAmount error from the offending input and a reason.
    pub fn invalid_amount(value: impl ToString, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidDocument error from the raw input.
    pub fn invalid_document(input: impl Into<String>) -> Self {
        CoreError::InvalidDocument {
            input: input.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed document number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::invalid_amount("abc", "not a number");
        assert_eq!(err.to_string(), "Invalid amount 'abc': not a number");

        let err = CoreError::invalid_document("99999999999");
        assert_eq!(
            err.to_string(),
            "Invalid document '99999999999': not a CUIT, DNI or generic buyer"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "cost".to_string(),
        };
        assert_eq!(err.to_string(), "cost must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
