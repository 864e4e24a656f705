//! # Domain Types
//!
//! Core domain types used throughout Pampa POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Register     │   │    Movement     │   │  MovementLine   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  status         │   │  register_id    │   │  movement_id    │       │
//! │  │  opening_cents  │──▶│  kind           │──▶│  product_name   │       │
//! │  │  current_cents  │   │  amount_cents   │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MovementKind   │   │ PaymentMethod   │   │  RegisterStatus │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Ingreso        │   │  Efectivo       │   │  Open           │       │
//! │  │  Egreso         │   │  Debito         │   │  Closed         │       │
//! │  │  Sistema        │   │  Credito        │   └─────────────────┘       │
//! │  │  Cierre         │   │  Transferencia  │                              │
//! │  └─────────────────┘   │  MercadoPago    │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unsigned-Magnitude Pattern
//! Movement amounts are stored as non-negative magnitudes; the `MovementKind`
//! carries the direction. `MovementKind::balance_delta` is the single place
//! that turns (kind, amount) into a signed balance change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::numbering::DocumentNumber;

// =============================================================================
// Register Status
// =============================================================================

/// Lifecycle state of a register session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    /// Session is accepting movements.
    Open,
    /// Session has been counted and closed.
    Closed,
}

impl Default for RegisterStatus {
    fn default() -> Self {
        RegisterStatus::Open
    }
}

// =============================================================================
// Register
// =============================================================================

/// A cash register session.
///
/// At most one register can be open at any time; every cash movement and
/// every sale hangs off the currently open session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Register {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the session was opened.
    pub opened_at: DateTime<Utc>,

    /// Cash counted into the drawer at opening, in cents.
    pub opening_balance_cents: i64,

    /// Running balance: opening + ingresos - egresos, in cents.
    pub current_balance_cents: i64,

    /// Open or closed.
    pub status: RegisterStatus,

    /// When the session was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,

    /// Balance at closing time (frozen copy of current_balance_cents).
    pub closing_balance_cents: Option<i64>,

    /// Operator who closed the session.
    pub closed_by_name: Option<String>,
    pub closed_by_id: Option<String>,

    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Register {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }

    /// Returns the current running balance as Money.
    #[inline]
    pub fn current_balance(&self) -> Money {
        Money::from_cents(self.current_balance_cents)
    }

    /// Returns the frozen closing balance, if the session is closed.
    #[inline]
    pub fn closing_balance(&self) -> Option<Money> {
        self.closing_balance_cents.map(Money::from_cents)
    }

    /// Checks whether the session is still accepting movements.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }
}

// =============================================================================
// Movement Kind
// =============================================================================

/// Direction/category of a register movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Money into the drawer (sales, deposits).
    Ingreso,
    /// Money out of the drawer (withdrawals, supplier payments).
    Egreso,
    /// Informational entry recorded by the system, no cash effect.
    Sistema,
    /// Closing marker written when the session is closed, no cash effect.
    Cierre,
}

impl MovementKind {
    /// Signed balance change this movement applies to the register.
    ///
    /// `Ingreso` adds the magnitude, `Egreso` subtracts it, and the two
    /// bookkeeping kinds leave the balance untouched.
    pub fn balance_delta(&self, amount: Money) -> Money {
        match self {
            MovementKind::Ingreso => amount,
            MovementKind::Egreso => -amount,
            MovementKind::Sistema | MovementKind::Cierre => Money::ZERO,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementKind::Ingreso => "Ingreso",
            MovementKind::Egreso => "Egreso",
            MovementKind::Sistema => "Sistema",
            MovementKind::Cierre => "Cierre",
        };
        write!(f, "{label}")
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the buyer paid.
///
/// Ordered so report rows come out in a stable, conventional order
/// (cash first, then cards, then transfers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Efectivo,
    /// Debit card on external terminal.
    Debito,
    /// Credit card on external terminal.
    Credito,
    /// Bank transfer.
    Transferencia,
    /// MercadoPago QR / link.
    MercadoPago,
}

impl PaymentMethod {
    /// True for methods that put physical cash in the drawer.
    #[inline]
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Efectivo)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Debito => "Débito",
            PaymentMethod::Credito => "Crédito",
            PaymentMethod::Transferencia => "Transferencia",
            PaymentMethod::MercadoPago => "MercadoPago",
        };
        write!(f, "{label}")
    }
}

// =============================================================================
// Movement
// =============================================================================

/// A single entry in a register session's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    pub id: String,
    pub register_id: String,
    pub kind: MovementKind,
    /// Non-negative magnitude in cents; `kind` carries the direction.
    pub amount_cents: i64,
    /// Operator- or system-written line, e.g. "Venta Remito 0001-00000042".
    pub description: String,
    /// How the money moved, when it did (None for bookkeeping entries).
    pub payment_method: Option<PaymentMethod>,
    /// Operator who recorded the movement.
    pub user_name: String,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
}

impl Movement {
    /// Returns the magnitude as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Signed effect of this movement on the register balance.
    #[inline]
    pub fn balance_delta(&self) -> Money {
        self.kind.balance_delta(self.amount())
    }
}

// =============================================================================
// Movement Line
// =============================================================================

/// A product line attached to a sale movement.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MovementLine {
    pub id: String,
    pub movement_id: String,
    pub product_id: String,
    /// Product title at time of sale (frozen).
    pub product_name: String,
    /// Units sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total (unit_price × quantity).
    pub subtotal_cents: i64,
}

impl MovementLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on tickets.
    pub title: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Purchase cost in cents.
    pub cost_cents: i64,

    /// Margin over cost in basis points (3000 = 30%).
    pub margin_bps: i64,

    /// Sale price in cents, derived from cost and margin.
    pub price_cents: i64,

    /// Current stock level. May go negative if counts drift.
    pub stock: i64,

    pub category: Option<String>,
    pub supplier: Option<String>,
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Recomputes the sale price from the current cost and margin.
    pub fn derived_price(&self) -> Money {
        Money::price_from_cost(self.cost(), self.margin_bps)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A buyer on record.
///
/// `document` holds the raw digits the operator typed: a CUIT (11 digits),
/// a DNI (8 digits), or `"0"` for the anonymous walk-in buyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub name: String,
    pub last_name: Option<String>,
    pub document: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Full display name for tickets and listings.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.name, last),
            _ => self.name.clone(),
        }
    }
}

// =============================================================================
// Document Type
// =============================================================================

/// Which fiscal document a sale produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Internal delivery note, numbered locally.
    Remito,
    /// Factura C authorized by AFIP.
    FacturaC,
    /// Simple payment receipt, not numbered.
    Recibo,
    /// Credit note reversing a prior sale.
    NotaCredito,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentType::Remito => "REMITO",
            DocumentType::FacturaC => "FACTURA C",
            DocumentType::Recibo => "RECIBO",
            DocumentType::NotaCredito => "NOTA DE CRÉDITO",
        };
        write!(f, "{label}")
    }
}

// =============================================================================
// Acting User
// =============================================================================

/// Who is performing an operation, for the movement audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActingUser {
    pub id: String,
    pub name: String,
}

impl ActingUser {
    /// The synthetic user attached to movements the system records on its
    /// own (closing markers, automatic adjustments).
    pub fn system() -> Self {
        ActingUser {
            id: "system-001".to_string(),
            name: "Sistema".to_string(),
        }
    }
}

// =============================================================================
// CAE Authorization
// =============================================================================

/// Authorization data AFIP returns for an accepted Factura C.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaeAuthorization {
    /// Full document number, e.g. 0003-00001234.
    pub number: DocumentNumber,
    /// Electronic authorization code.
    pub cae: String,
    /// CAE expiry date as AFIP sent it.
    pub cae_due_date: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
