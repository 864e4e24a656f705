//! # Document Numbering
//!
//! Fiscal document numbers in the `PPPP-NNNNNNNN` form: a 4-digit point of
//! sale and an 8-digit sequence, both zero-padded. Remito sequences come
//! from the local counter; Factura C numbers come back from AFIP.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Document Number
// =============================================================================

/// A fully-qualified document number: point of sale + sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentNumber {
    pub point_of_sale: u32,
    pub sequence: u64,
}

impl DocumentNumber {
    pub const fn new(point_of_sale: u32, sequence: u64) -> Self {
        DocumentNumber {
            point_of_sale,
            sequence,
        }
    }

    /// Parses `"PPPP-NNNNNNNN"`. Padding width is not enforced so numbers
    /// AFIP formats with extra digits still parse.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "document_number".to_string(),
            reason: reason.to_string(),
        };

        let (pos_part, seq_part) = input
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected PPPP-NNNNNNNN"))?;

        if pos_part.is_empty() || !pos_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("point of sale must be digits"));
        }
        if seq_part.is_empty() || !seq_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("sequence must be digits"));
        }

        let point_of_sale = pos_part
            .parse::<u32>()
            .map_err(|_| invalid("point of sale out of range"))?;
        let sequence = seq_part
            .parse::<u64>()
            .map_err(|_| invalid("sequence out of range"))?;

        Ok(DocumentNumber::new(point_of_sale, sequence))
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:08}", self.point_of_sale, self.sequence)
    }
}

impl FromStr for DocumentNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentNumber::parse(s)
    }
}

// Serialized as the display string, so tickets and logs carry
// "0001-00000042" rather than a two-field object.
impl Serialize for DocumentNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads() {
        assert_eq!(DocumentNumber::new(1, 42).to_string(), "0001-00000042");
        assert_eq!(
            DocumentNumber::new(3, 12345678).to_string(),
            "0003-12345678"
        );
    }

    #[test]
    fn test_display_widens_past_padding() {
        assert_eq!(
            DocumentNumber::new(12345, 123456789).to_string(),
            "12345-123456789"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let n: DocumentNumber = "0003-00001234".parse().unwrap();
        assert_eq!(n.point_of_sale, 3);
        assert_eq!(n.sequence, 1234);
        assert_eq!(n.to_string(), "0003-00001234");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DocumentNumber::parse("").is_err());
        assert!(DocumentNumber::parse("0003").is_err());
        assert!(DocumentNumber::parse("ab-cd").is_err());
        assert!(DocumentNumber::parse("-00000001").is_err());
        assert!(DocumentNumber::parse("0001-").is_err());
        assert!(DocumentNumber::parse("0001-12-34").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let n = DocumentNumber::new(1, 42);
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"0001-00000042\"");

        let back: DocumentNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
