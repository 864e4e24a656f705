//! # Repository Module
//!
//! Database repository implementations for Pampa POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout Service                                                      │
//! │       │                                                                 │
//! │       │  db.registers().record_movement(movement)                      │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  RegisterRepository                                                    │
//! │  ├── open(&self, opening_balance)                                      │
//! │  ├── find_open(&self)                                                  │
//! │  ├── record_movement(&self, movement)                                  │
//! │  └── close(&self, id, closing_balance, closed_by)                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory SQLite, no mocks needed)                    │
//! │  • SQL is isolated in one place                                        │
//! │  • Balance arithmetic stays inside one transaction                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`register::RegisterRepository`] - Register sessions and the movement ledger
//! - [`counter::CounterRepository`] - Atomic document counters (remito numbering)
//! - [`product::ProductRepository`] - Product CRUD, search, and stock
//! - [`client::ClientRepository`] - Client CRUD and search

pub mod client;
pub mod counter;
pub mod product;
pub mod register;
