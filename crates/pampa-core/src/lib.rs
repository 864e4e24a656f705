//! # pampa-core: Pure Business Logic for Pampa POS
//!
//! This crate is the **heart** of Pampa POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pampa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pampa-checkout                               │   │
//! │  │    open register ──► record sale ──► close register            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pampa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ document  │  │   │
//! │  │   │ Register  │  │   Money   │  │   Cart    │  │ CUIT/DNI  │  │   │
//! │  │   │ Movement  │  │ IVA split │  │ CartItem  │  │ receptor  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │ numbering │  │  report   │  │ validation│                 │   │
//! │  │   │ 0001-0000…│  │ summaries │  │   rules   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             pampa-db (SQLite) / pampa-fiscal (AFIP)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Register, Movement, Client, Product, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`document`] - CUIT/DNI classification and fiscal receptor resolution
//! - [`cart`] - Checkout cart with snapshot line items
//! - [`numbering`] - Document number formatting (`0001-00000042`)
//! - [`report`] - Register session summaries computed from movements
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pampa_core::money::Money;
//!
//! // Unit prices are IVA-inclusive; split out the 21% component
//! let total = Money::from_cents(12100); // $121.00
//! let (net, iva) = total.split_iva();
//!
//! assert_eq!(net.cents(), 10000);  // $100.00
//! assert_eq!(iva.cents(), 2100);   // $21.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod document;
pub mod error;
pub mod money;
pub mod numbering;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pampa_core::Money` instead of
// `use pampa_core::money::Money`

pub use cart::{Cart, CartItem};
pub use document::{classify_document, resolve_receptor, DocumentId, Receptor};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use numbering::DocumentNumber;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// IVA rate in basis points (21%), the fixed VAT applied to every sale.
///
/// ## Why a constant?
/// Every price in the system is IVA-inclusive at the general 21% rate.
/// Reduced rates (10.5%) are not carried by this store's catalog, so the
/// rate is not a per-product attribute.
pub const IVA_RATE_BPS: u32 = 2100;

/// Total below which a buyer named "consumidor final" is always reported to
/// the fiscal authority as the generic-buyer sentinel, regardless of any
/// document number typed into the form. AFIP requires buyer identification
/// only from this amount upward.
pub const CONSUMIDOR_FINAL_CAP_CENTS: i64 = 9_999_999; // $99,999.99

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
