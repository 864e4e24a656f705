//! # Pampa Checkout
//!
//! Sale orchestration for the point of sale: wires the pure domain, the
//! SQLite ledger and the AFIP client into the operations the terminal
//! exposes to operators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      pampa-checkout                         │
//! │                                                             │
//! │  ┌───────────────┐  ┌───────────────┐  ┌─────────────────┐  │
//! │  │    config     │  │    service    │  │     ticket      │  │
//! │  │               │  │               │  │                 │  │
//! │  │ TOML + env    │─►│ CheckoutSvc   │─►│ SaleTicket      │  │
//! │  │ store/afip/db │  │ finalize_sale │  │ remito/factura/ │  │
//! │  │               │  │ register ops  │  │ receipt shapes  │  │
//! │  └───────────────┘  └───────┬───────┘  └─────────────────┘  │
//! │                             │                               │
//! └─────────────────────────────┼───────────────────────────────┘
//!                               │
//!            ┌──────────────────┼──────────────────┐
//!            ▼                  ▼                  ▼
//!      pampa-core          pampa-db          pampa-fiscal
//!      (domain)            (ledger)          (AFIP HTTP)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use pampa_checkout::{AppConfig, CheckoutService};
//! use pampa_db::Database;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//! let service = CheckoutService::new(db, config.afip_client()?, config.store_info()?);
//!
//! let register = service.open_register("1500").await?;
//! println!("register {} open", register.id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod ticket;

pub use config::{AfipConfig, AppConfig, DatabaseConfig, StoreConfig};
pub use error::{CheckoutError, CheckoutResult};
pub use service::{CheckoutService, StoreInfo};
pub use ticket::{FacturaTicket, ReceiptTicket, RemitoTicket, SaleTicket, TicketLine};
