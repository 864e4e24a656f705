//! # Buyer Document Identity
//!
//! Classifies buyer documents and resolves the receptor AFIP sees.
//!
//! ## Classification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     classify_document(input)                            │
//! │                                                                         │
//! │  raw input ──▶ strip every non-digit ("20-1234..." ≡ "201234...")       │
//! │                     │                                                   │
//! │        ┌────────────┼────────────────┬──────────────┐                   │
//! │        ▼            ▼                ▼              ▼                   │
//! │   "" or "0"      8 digits        11 digits     other length             │
//! │        │            │                │              │                   │
//! │        ▼            ▼                ▼              ▼                   │
//! │    Generic        Dni(n)     prefix ∈ {20,23,   InvalidDocument         │
//! │   (99 / 0)       (96 / n)    24,27,30,33,34}?                           │
//! │                                  │yes      │no                          │
//! │                                  ▼         ▼                            │
//! │                              Cuit(n)   InvalidDocument                  │
//! │                              (80 / n)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every caller that needs to know what kind of document a buyer presented
//! goes through `classify_document`. There is exactly one copy of the
//! length/prefix rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::CONSUMIDOR_FINAL_CAP_CENTS;

/// Prefixes a valid CUIT can start with (personas físicas 20/23/24/27,
/// personas jurídicas 30/33/34).
pub const CUIT_PREFIXES: [u64; 7] = [20, 23, 24, 27, 30, 33, 34];

/// AFIP document type code for CUIT.
pub const DOC_TYPE_CUIT: u32 = 80;
/// AFIP document type code for DNI.
pub const DOC_TYPE_DNI: u32 = 96;
/// AFIP document type code for the anonymous final consumer.
pub const DOC_TYPE_CONSUMIDOR_FINAL: u32 = 99;

// =============================================================================
// Document Id
// =============================================================================

/// A classified buyer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "number")]
pub enum DocumentId {
    /// No document: the anonymous final consumer.
    Generic,
    /// An 8-digit Documento Nacional de Identidad.
    Dni(u64),
    /// An 11-digit CUIT with a recognized prefix.
    Cuit(u64),
}

impl DocumentId {
    /// AFIP numeric code for this document type (80 / 96 / 99).
    pub fn afip_doc_type(&self) -> u32 {
        match self {
            DocumentId::Generic => DOC_TYPE_CONSUMIDOR_FINAL,
            DocumentId::Dni(_) => DOC_TYPE_DNI,
            DocumentId::Cuit(_) => DOC_TYPE_CUIT,
        }
    }

    /// The document number AFIP receives (0 for the generic buyer).
    pub fn number(&self) -> u64 {
        match self {
            DocumentId::Generic => 0,
            DocumentId::Dni(n) | DocumentId::Cuit(n) => *n,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Generic => write!(f, "Consumidor Final"),
            DocumentId::Dni(n) => write!(f, "DNI {n}"),
            DocumentId::Cuit(n) => {
                // 20-12345678-9 hyphenation for tickets.
                let prefix = n / 1_000_000_000;
                let body = (n / 10) % 100_000_000;
                let check = n % 10;
                write!(f, "CUIT {prefix:02}-{body:08}-{check}")
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Classifies a raw buyer document string.
///
/// Every non-digit character is stripped first, so `"20-12345678-9"`,
/// `"20.12345678.9"` and `"20123456789"` are the same CUIT and a field
/// with no digits at all means "no document". An unrecognized digit count,
/// or an 11-digit number with a prefix outside the CUIT whitelist, is
/// rejected.
///
/// ## Examples
/// ```
/// use pampa_core::{classify_document, DocumentId};
///
/// assert_eq!(classify_document("").unwrap(), DocumentId::Generic);
/// assert_eq!(classify_document("0").unwrap(), DocumentId::Generic);
/// assert_eq!(
///     classify_document("12345678").unwrap(),
///     DocumentId::Dni(12345678)
/// );
/// assert_eq!(
///     classify_document("20-12345678-9").unwrap(),
///     DocumentId::Cuit(20123456789)
/// );
/// assert!(classify_document("99999999999").is_err());
/// ```
pub fn classify_document(input: &str) -> CoreResult<DocumentId> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() || digits == "0" {
        return Ok(DocumentId::Generic);
    }

    match digits.len() {
        8 => {
            let n = digits
                .parse::<u64>()
                .map_err(|_| CoreError::invalid_document(input))?;
            Ok(DocumentId::Dni(n))
        }
        11 => {
            let n = digits
                .parse::<u64>()
                .map_err(|_| CoreError::invalid_document(input))?;
            let prefix = n / 1_000_000_000;
            if CUIT_PREFIXES.contains(&prefix) {
                Ok(DocumentId::Cuit(n))
            } else {
                Err(CoreError::invalid_document(input))
            }
        }
        _ => Err(CoreError::invalid_document(input)),
    }
}

// =============================================================================
// Receptor Resolution
// =============================================================================

/// The buyer identity a fiscal request carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receptor {
    /// Buyer name as it appears on the invoice.
    pub name: String,
    /// AFIP document type code (80 / 96 / 99).
    pub doc_type: u32,
    /// Document number (0 for the generic buyer).
    pub doc_number: u64,
}

impl Receptor {
    /// The anonymous walk-in buyer.
    pub fn consumidor_final() -> Self {
        Receptor {
            name: "Consumidor Final".to_string(),
            doc_type: DOC_TYPE_CONSUMIDOR_FINAL,
            doc_number: 0,
        }
    }
}

/// Resolves the receptor for an invoice from the buyer's name, their raw
/// document string and the sale total.
///
/// A buyer literally named "consumidor final" (any casing) on a sale below
/// the identification threshold is always sent as the generic buyer, even
/// if a document is on record. At or above the threshold the stored
/// document wins, because AFIP requires the buyer to be identified.
pub fn resolve_receptor(name: &str, document: &str, total: Money) -> CoreResult<Receptor> {
    let trimmed = name.trim();
    let is_final_consumer_name = trimmed.eq_ignore_ascii_case("consumidor final");

    if is_final_consumer_name && total.cents() < CONSUMIDOR_FINAL_CAP_CENTS {
        return Ok(Receptor::consumidor_final());
    }

    match classify_document(document)? {
        DocumentId::Generic => Ok(Receptor::consumidor_final()),
        doc => Ok(Receptor {
            name: trimmed.to_string(),
            doc_type: doc.afip_doc_type(),
            doc_number: doc.number(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
