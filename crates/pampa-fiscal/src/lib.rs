//! # Pampa Fiscal - AFIP Invoicing Client
//!
//! This crate owns the HTTP conversation with the invoicing backend: wire
//! payloads, the emission call, rejection handling, and the fiscal QR.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         pampa-fiscal                                    │
//! │                                                                         │
//! │  ┌──────────┐   ┌───────────────────────────────┐   ┌──────────┐       │
//! │  │ wire.rs  │   │          client.rs            │   │  qr.rs   │       │
//! │  │          │   │                               │   │          │       │
//! │  │ Invoice  │──▶│ FiscalAuthority (trait)       │   │ QrPayload│       │
//! │  │ Request/ │   │ AfipClient (reqwest impl)     │   │ encoding │       │
//! │  │ Response │   │ timeout / rejection handling  │   │          │       │
//! │  └──────────┘   └───────────────────────────────┘   └──────────┘       │
//! │                                                                         │
//! │  What this crate does NOT know about:                                  │
//! │  • carts, registers, movements (pampa-core / pampa-db)                 │
//! │  • when to invoice and what to do afterwards (pampa-checkout)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Discipline
//! Timeout, rejection, and backend failure are three different operator
//! situations and stay three different [`FiscalError`] variants. A rejection
//! always carries the authority's stated reason.

pub mod client;
pub mod error;
pub mod qr;
pub mod wire;

// Re-export the main types for convenient access
pub use client::{AfipClient, FiscalAuthority};
pub use error::{FiscalError, FiscalResult};
pub use qr::QrPayload;
pub use wire::{InvoiceRequest, InvoiceResponse, Observacion, Observaciones, ReceptorPayload};
