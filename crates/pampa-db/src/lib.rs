//! # pampa-db: Database Layer for Pampa POS
//!
//! This crate provides database access for the Pampa POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pampa POS Data Flow                              │
//! │                                                                         │
//! │  CheckoutService (finalize_sale / open_register / …)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pampa-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │(register.rs …)│    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ RegisterRepo  │    │ 001_registers│  │   │
//! │  │   │ Connection    │◄───│ CounterRepo   │    │ 002_catalog  │  │   │
//! │  │   │ Management    │    │ ProductRepo   │    │ 003_counters │  │   │
//! │  │   └───────────────┘    │ ClientRepo    │    └──────────────┘  │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/pampa-pos/pampa.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (register, counter, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pampa_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/db.sqlite");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let register = db.registers().open(Money::from_pesos(1000)).await?;
//! let number = db.counters().next_remito_number().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::{ClientRepository, NewClient};
pub use repository::counter::CounterRepository;
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::register::{NewMovement, NewMovementLine, RegisterRepository};
