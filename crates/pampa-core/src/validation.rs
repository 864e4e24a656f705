//! # Validation Module
//!
//! Input validation utilities for Pampa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Checkout Service (Rust)                                       │
//! │  ├── THIS MODULE: field-level checks before any write                   │
//! │  └── Domain rules (document classification, money parsing)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── Partial UNIQUE index (one open register)                           │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: both layers catch different errors                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use pampa_core::validation::validate_product_title;
///
/// assert!(validate_product_title("Premezcla sin TACC 1kg").is_ok());
/// assert!(validate_product_title("").is_err());
/// ```
pub fn validate_product_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a client name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 120 characters
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a movement description.
///
/// Every ledger entry must say what it was for; an empty line is useless
/// at close time.
pub fn validate_movement_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
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

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the magnitude of an operator-recorded movement.
///
/// ## Rules
/// - Must be positive (> 0); zero-amount bookkeeping entries are written
///   by the system, never typed by an operator
pub fn validate_movement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a product cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional items)
pub fn validate_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a margin in basis points.
///
/// ## Rules
/// - Must be between 0 and 100000 (0% to 1000%)
/// - Retail margins usually sit between 2000 and 6000 (20% to 60%)
pub fn validate_margin_bps(bps: i64) -> ValidationResult<()> {
    if !(0..=100_000).contains(&bps) {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: 0,
            max: 100_000,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use pampa_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
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
    fn test_validate_product_title() {
        assert!(validate_product_title("Premezcla sin TACC 1kg").is_ok());
        assert!(validate_product_title("").is_err());
        assert!(validate_product_title("   ").is_err());
        assert!(validate_product_title(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Ana García").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_movement_description() {
        assert!(validate_movement_description("Pago proveedor harinas").is_ok());
        assert!(validate_movement_description("").is_err());
        assert!(validate_movement_description(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_movement_amount() {
        assert!(validate_movement_amount(1).is_ok());
        assert!(validate_movement_amount(150_000).is_ok());
        assert!(validate_movement_amount(0).is_err());
        assert!(validate_movement_amount(-100).is_err());
    }

    #[test]
    fn test_validate_cost_cents() {
        assert!(validate_cost_cents(0).is_ok());
        assert!(validate_cost_cents(1099).is_ok());
        assert!(validate_cost_cents(-100).is_err());
    }

    #[test]
    fn test_validate_margin_bps() {
        assert!(validate_margin_bps(0).is_ok());
        assert!(validate_margin_bps(3000).is_ok());
        assert!(validate_margin_bps(100_000).is_ok());
        assert!(validate_margin_bps(-1).is_err());
        assert!(validate_margin_bps(100_001).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  harina  ").unwrap(), "harina");
        assert!(validate_search_query("").is_ok());
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
