//! # Checkout Error Types
//!
//! One error enum for everything the checkout layer surfaces to the operator.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Validation   │  │  State Conflict │  │       Remote            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  EmptyCart      │  │  NoOpenRegister │  │  Fiscal(Timeout)        │ │
//! │  │  Core(...)      │  │  RegisterConfl. │  │  Fiscal(Rejected)       │ │
//! │  │                 │  │  NotFound       │  │  Fiscal(ServerError)    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐ │
//! │  │   Persistence   │  │               Configuration                 │ │
//! │  │                 │  │                                             │ │
//! │  │  Persistence(..)│  │  InvalidConfig / ConfigIo / ConfigParse     │ │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The category decides what the UI does: validation errors keep the form
//! open, state conflicts refresh the register view, remote errors offer a
//! retry or a fallback to Remito, and persistence errors stop the terminal.

use thiserror::Error;

use pampa_core::{CoreError, ValidationError};
use pampa_db::DbError;
use pampa_fiscal::FiscalError;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Everything that can go wrong between "Cobrar" and a printed ticket.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Finalizing a sale with nothing in the cart.
    ///
    /// Checked before anything else: an empty cart must not consume a
    /// remito number or touch the register, even when no register is open.
    #[error("Cannot finalize a sale with an empty cart")]
    EmptyCart,

    /// A domain rule rejected the input (bad amount, bad document, cart
    /// limits).
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // State Conflicts
    // =========================================================================
    /// A sale or movement needs an open register and none exists.
    #[error("No open register. Open a register before recording sales.")]
    NoOpenRegister,

    /// The register changed under us (already open, closed meanwhile, or
    /// gone). The operator resolves this by refreshing their view.
    #[error("Register conflict: {0}")]
    RegisterConflict(DbError),

    /// A referenced entity no longer exists (product deleted while in a
    /// cart, client removed from the registry meanwhile).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The fiscal authority rejected, timed out or failed. The sale was NOT
    /// recorded; cart, stock and balance are untouched.
    #[error("Fiscal authority error: {0}")]
    Fiscal(#[from] FiscalError),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// The ledger write itself failed (disk, corruption, pool exhausted).
    /// The enclosing transaction rolled back, so nothing was half-applied.
    #[error("Persistence failure: {0}")]
    Persistence(DbError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The loaded configuration fails validation (bad CUIT, bad URL).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or written.
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized for saving.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

// =============================================================================
// Error Conversions
// =============================================================================

// Not a #[from]: register state conflicts and real persistence failures
// must land in different categories, and only the db layer knows which
// variant is which.
impl From<DbError> for CheckoutError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CheckoutError::NotFound { entity, id },
            err if err.is_state_conflict() => CheckoutError::RegisterConflict(err),
            err => CheckoutError::Persistence(err),
        }
    }
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CheckoutError {
    /// True when the operator can fix the problem by editing their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::EmptyCart | CheckoutError::Core(_))
    }

    /// True when another terminal changed the state under this one and a
    /// refresh resolves it.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            CheckoutError::NoOpenRegister
                | CheckoutError::RegisterConflict(_)
                | CheckoutError::NotFound { .. }
        )
    }

    /// True when retrying the fiscal request (or falling back to a Remito)
    /// is a reasonable next step.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Fiscal(err) => err.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_state_conflicts_map_to_register_conflict() {
        let err: CheckoutError = DbError::RegisterAlreadyOpen.into();
        assert!(matches!(err, CheckoutError::RegisterConflict(_)));
        assert!(err.is_state_conflict());

        let err: CheckoutError = DbError::RegisterNotOpen("r-1".into()).into();
        assert!(matches!(err, CheckoutError::RegisterConflict(_)));
    }

    #[test]
    fn test_db_failures_map_to_persistence() {
        let err: CheckoutError = DbError::QueryFailed("disk I/O error".into()).into();
        assert!(matches!(err, CheckoutError::Persistence(_)));
        assert!(!err.is_state_conflict());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_db_not_found_keeps_entity_context() {
        let err: CheckoutError = DbError::not_found("Product", "p-123").into();
        assert!(matches!(err, CheckoutError::NotFound { .. }));
        assert_eq!(err.to_string(), "Product not found: p-123");
    }

    #[test]
    fn test_fiscal_timeout_is_retryable() {
        let err = CheckoutError::Fiscal(FiscalError::Timeout { seconds: 30 });
        assert!(err.is_retryable());

        let err = CheckoutError::Fiscal(FiscalError::Rejected {
            reason: "CUIT inexistente".into(),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_cart_is_validation() {
        assert!(CheckoutError::EmptyCart.is_validation());
        assert!(!CheckoutError::NoOpenRegister.is_validation());
    }
}
