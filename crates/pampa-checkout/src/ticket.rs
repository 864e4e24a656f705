//! # Printable Sale Tickets
//!
//! Data for the printable artifact a finalized sale produces. Rendering
//! (58mm thermal layout, QR image, PDF) lives outside this crate; these
//! structs carry everything the printing layer needs, already formatted
//! where the format is fiscal (document numbers, QR URL).
//!
//! ```text
//! finalize_sale ──► SaleTicket ──(serde JSON)──► printing layer
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pampa_core::{CartItem, DocumentNumber, DocumentType, Money, PaymentMethod, Receptor};

// =============================================================================
// Ticket Line
// =============================================================================

/// One printed line: quantity × unit price = subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLine {
    pub title: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl From<&CartItem> for TicketLine {
    fn from(item: &CartItem) -> Self {
        TicketLine {
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price(),
            subtotal: item.subtotal(),
        }
    }
}

// =============================================================================
// Ticket Variants
// =============================================================================

/// A delivery note, numbered locally.
///
/// Prints with the "Este remito no es válido como factura" footer; it
/// carries no tax breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemitoTicket {
    pub store_name: String,
    pub number: DocumentNumber,
    pub issued_at: DateTime<Utc>,
    pub client_name: String,
    /// Digits as stored; omitted on the printout when the buyer is generic.
    pub client_document: Option<String>,
    pub lines: Vec<TicketLine>,
    pub total: Money,
    pub payment_method: PaymentMethod,
}

/// An AFIP-authorized Factura C.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaTicket {
    pub store_name: String,
    /// Issuer CUIT, printed in the header.
    pub store_cuit: u64,
    /// Number assigned by AFIP, point of sale included.
    pub number: DocumentNumber,
    pub issued_at: DateTime<Utc>,
    /// Buyer as reported to AFIP. `doc_type` picks the printed label
    /// (DNI / CUIT / consumidor final).
    pub receptor: Receptor,
    pub lines: Vec<TicketLine>,
    /// Net amount (total with the 21% IVA stripped).
    pub net: Money,
    /// IVA component, printed separately under Ley 27.743.
    pub iva: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Electronic authorization code.
    pub cae: String,
    /// CAE expiry as AFIP sent it (YYYY-MM-DD).
    pub cae_due_date: String,
    /// Full fiscal QR URL, ready to encode as an image.
    pub qr_url: String,
}

/// A plain receipt or credit note. Not a fiscal document and not
/// numbered; the label distinguishes the two on the printout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptTicket {
    pub store_name: String,
    pub document_type: DocumentType,
    pub issued_at: DateTime<Utc>,
    pub client_name: String,
    pub lines: Vec<TicketLine>,
    pub total: Money,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Sale Ticket
// =============================================================================

/// The printable artifact of a finalized sale.
///
/// Serialized with a `type` tag so the printing layer can dispatch on the
/// layout without inspecting fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SaleTicket {
    Remito(RemitoTicket),
    FacturaC(FacturaTicket),
    Receipt(ReceiptTicket),
}

impl SaleTicket {
    /// The document type this ticket prints as.
    pub fn document_type(&self) -> DocumentType {
        match self {
            SaleTicket::Remito(_) => DocumentType::Remito,
            SaleTicket::FacturaC(_) => DocumentType::FacturaC,
            SaleTicket::Receipt(t) => t.document_type,
        }
    }

    /// Sale total, IVA included.
    pub fn total(&self) -> Money {
        match self {
            SaleTicket::Remito(t) => t.total,
            SaleTicket::FacturaC(t) => t.total,
            SaleTicket::Receipt(t) => t.total,
        }
    }

    pub fn lines(&self) -> &[TicketLine] {
        match self {
            SaleTicket::Remito(t) => &t.lines,
            SaleTicket::FacturaC(t) => &t.lines,
            SaleTicket::Receipt(t) => &t.lines,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
