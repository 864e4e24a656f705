//! # Fiscal QR Payload
//!
//! AFIP mandates a QR on every electronic invoice (RG 4892/2020). The QR
//! encodes a base64 JSON payload appended to a fixed AFIP URL; scanning it
//! opens AFIP's verification page for that exact invoice.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  { "ver": 1, "fecha": "2026-08-22", "cuit": 20267036099,               │
//! │    "ptoVta": 3, "tipoCmp": 11, "nroCmp": 50, "importe": 242.0,         │
//! │    "moneda": "PES", "ctz": 1, "tipoDocRec": 80,                        │
//! │    "nroDocRec": 27223334445, "tipoCodAut": "E", "codAut": 7412... }    │
//! │       │                                                                 │
//! │       ▼  base64                                                         │
//! │  https://www.afip.gob.ar/fe/qr/?p=eyJ2ZXIiOjEsImZlY2hhIjo...           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FiscalError, FiscalResult};
use pampa_core::{CaeAuthorization, Money, Receptor};

/// AFIP's invoice verification endpoint; the payload rides the `p` parameter.
const QR_BASE_URL: &str = "https://www.afip.gob.ar/fe/qr/?p=";

/// Comprobante code for Factura C.
const TIPO_CMP_FACTURA_C: u8 = 11;

/// Payload behind the fiscal QR, field names per AFIP's published layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrPayload {
    /// Payload layout version. Always 1.
    pub ver: u8,
    /// Invoice date, YYYY-MM-DD.
    pub fecha: String,
    /// Issuer's CUIT (the store, not the buyer).
    pub cuit: u64,
    #[serde(rename = "ptoVta")]
    pub pto_vta: u32,
    #[serde(rename = "tipoCmp")]
    pub tipo_cmp: u8,
    #[serde(rename = "nroCmp")]
    pub nro_cmp: u64,
    /// Total in pesos.
    pub importe: f64,
    pub moneda: String,
    /// Exchange rate; 1 for pesos.
    pub ctz: f64,
    #[serde(rename = "tipoDocRec")]
    pub tipo_doc_rec: u32,
    #[serde(rename = "nroDocRec")]
    pub nro_doc_rec: u64,
    /// Authorization scheme: "E" for CAE.
    #[serde(rename = "tipoCodAut")]
    pub tipo_cod_aut: String,
    #[serde(rename = "codAut")]
    pub cod_aut: u64,
}

impl QrPayload {
    /// Builds the payload for an authorized Factura C.
    ///
    /// ## Errors
    /// `Encoding` if the CAE is not numeric (it is always a 14-digit number;
    /// anything else means the backend handed us garbage).
    pub fn factura_c(
        issuer_cuit: u64,
        authorization: &CaeAuthorization,
        receptor: &Receptor,
        total: Money,
        date: NaiveDate,
    ) -> FiscalResult<Self> {
        let cod_aut = authorization.cae.parse::<u64>().map_err(|_| {
            FiscalError::Encoding(format!("CAE is not numeric: {:?}", authorization.cae))
        })?;

        Ok(QrPayload {
            ver: 1,
            fecha: date.format("%Y-%m-%d").to_string(),
            cuit: issuer_cuit,
            pto_vta: authorization.number.point_of_sale,
            tipo_cmp: TIPO_CMP_FACTURA_C,
            nro_cmp: authorization.number.sequence,
            importe: total.to_f64(),
            moneda: "PES".to_string(),
            ctz: 1.0,
            tipo_doc_rec: receptor.doc_type,
            nro_doc_rec: receptor.doc_number,
            tipo_cod_aut: "E".to_string(),
            cod_aut,
        })
    }

    /// Renders the scannable URL.
    pub fn to_url(&self) -> FiscalResult<String> {
        let json = serde_json::to_vec(self).map_err(|e| FiscalError::Encoding(e.to_string()))?;
        Ok(format!("{}{}", QR_BASE_URL, BASE64.encode(json)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::DocumentNumber;

    fn authorization() -> CaeAuthorization {
        CaeAuthorization {
            number: DocumentNumber::new(3, 50),
            cae: "74123456789012".to_string(),
            cae_due_date: "2026-09-01".to_string(),
        }
    }

    #[test]
    fn test_payload_fields() {
        let payload = QrPayload::factura_c(
            20267036099,
            &authorization(),
            &Receptor::consumidor_final(),
            Money::from_cents(24_200),
            NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
        )
        .unwrap();

        assert_eq!(payload.ver, 1);
        assert_eq!(payload.fecha, "2026-08-22");
        assert_eq!(payload.tipo_cmp, 11);
        assert_eq!(payload.pto_vta, 3);
        assert_eq!(payload.nro_cmp, 50);
        assert_eq!(payload.importe, 242.0);
        assert_eq!(payload.tipo_doc_rec, 99);
        assert_eq!(payload.nro_doc_rec, 0);
        assert_eq!(payload.cod_aut, 74123456789012);
    }

    #[test]
    fn test_url_embeds_payload() {
        let payload = QrPayload::factura_c(
            20267036099,
            &authorization(),
            &Receptor::consumidor_final(),
            Money::from_cents(24_200),
            NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
        )
        .unwrap();

        let url = payload.to_url().unwrap();
        assert!(url.starts_with(QR_BASE_URL));

        let encoded = url.strip_prefix(QR_BASE_URL).unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(json["tipoCodAut"], "E");
        assert_eq!(json["moneda"], "PES");
        assert_eq!(json["cuit"], 20267036099u64);
    }

    #[test]
    fn test_non_numeric_cae_rejected() {
        let mut auth = authorization();
        auth.cae = "garbage".to_string();

        let err = QrPayload::factura_c(
            20267036099,
            &auth,
            &Receptor::consumidor_final(),
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, FiscalError::Encoding(_)));
    }
}
