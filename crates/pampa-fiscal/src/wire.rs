//! # Wire Payloads
//!
//! Request and response shapes for the AFIP invoicing backend.
//!
//! Field names on the wire are the backend's, not ours: camelCase on the
//! request, capitalized WSFE-style keys on the response. Serde renames keep
//! the Rust side readable.
//!
//! ## Conversation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /api/afip/emitir-factura-c                                       │
//! │  {                                                                      │
//! │    "cliente": { "nombre": "...", "tipoDoc": 80, "nroDoc": 20267036099 }│
//! │    "importeTotal": 242.0,                                               │
//! │    "importeNeto": 200.0,                                                │
//! │    "fecha": "20260822"                                                  │
//! │  }                                                                      │
//! │                                                                         │
//! │  Accepted:                         Rejected:                            │
//! │  {                                 {                                    │
//! │    "Resultado": "A",                 "Resultado": "R",                  │
//! │    "numeroFactura": "0003-00000050", "Observaciones": {                 │
//! │    "cae": "74123456789012",            "Obs": [                         │
//! │    "vencimientoCae": "2026-09-01"        { "Msg": "CUIT inexistente" }  │
//! │  }                                     ]                                │
//! │                                      }                                  │
//! │                                    }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FiscalError, FiscalResult};
use pampa_core::{CaeAuthorization, Money, Receptor};

/// Buyer block of the invoice request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptorPayload {
    pub nombre: String,
    /// AFIP document-type code: 80 = CUIT, 96 = DNI, 99 = generic buyer.
    #[serde(rename = "tipoDoc")]
    pub tipo_doc: u32,
    #[serde(rename = "nroDoc")]
    pub nro_doc: u64,
}

impl From<&Receptor> for ReceptorPayload {
    fn from(receptor: &Receptor) -> Self {
        ReceptorPayload {
            nombre: receptor.name.clone(),
            tipo_doc: receptor.doc_type,
            nro_doc: receptor.doc_number,
        }
    }
}

/// A Factura C emission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub cliente: ReceptorPayload,
    #[serde(rename = "importeTotal")]
    pub importe_total: f64,
    #[serde(rename = "importeNeto")]
    pub importe_neto: f64,
    /// Invoice date as the backend wants it: YYYYMMDD, no separators.
    pub fecha: String,
}

impl InvoiceRequest {
    /// Builds a request from domain values.
    ///
    /// Amounts travel as decimal pesos. Internally everything is cents, so
    /// the float conversion happens here, at the wire boundary, and nowhere
    /// else.
    pub fn new(receptor: &Receptor, total: Money, net: Money, date: NaiveDate) -> Self {
        InvoiceRequest {
            cliente: ReceptorPayload::from(receptor),
            importe_total: total.to_f64(),
            importe_neto: net.to_f64(),
            fecha: date.format("%Y%m%d").to_string(),
        }
    }
}

/// One observation inside a rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observacion {
    #[serde(rename = "Msg")]
    pub msg: String,
}

/// Container for the authority's stated rejection reasons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observaciones {
    #[serde(rename = "Obs", default)]
    pub obs: Vec<Observacion>,
}

/// The backend's answer to an emission request.
///
/// All fields except `Resultado` are optional because rejections carry
/// observations but no CAE, and acceptances carry a CAE but no observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(rename = "Resultado")]
    pub resultado: String,

    #[serde(rename = "numeroFactura", default)]
    pub numero_factura: Option<String>,

    #[serde(default)]
    pub cae: Option<String>,

    #[serde(rename = "vencimientoCae", default)]
    pub vencimiento_cae: Option<String>,

    #[serde(rename = "Observaciones", default)]
    pub observaciones: Option<Observaciones>,
}

impl InvoiceResponse {
    /// True when the authority accepted the invoice.
    pub fn is_accepted(&self) -> bool {
        self.resultado == "A"
    }

    /// Collects the authority's stated reasons into one line.
    fn rejection_reason(&self) -> String {
        let msgs: Vec<&str> = self
            .observaciones
            .iter()
            .flat_map(|o| o.obs.iter())
            .map(|obs| obs.msg.as_str())
            .filter(|msg| !msg.is_empty())
            .collect();

        if msgs.is_empty() {
            format!("resultado {} sin observaciones", self.resultado)
        } else {
            msgs.join("; ")
        }
    }

    /// Converts the wire response into an authorization, or the appropriate
    /// error.
    ///
    /// ## Errors
    /// * `Rejected` with the authority's reason when `Resultado` is not "A"
    /// * `InvalidResponse` when an acceptance is missing its number or CAE
    pub fn into_authorization(self) -> FiscalResult<CaeAuthorization> {
        if !self.is_accepted() {
            return Err(FiscalError::Rejected {
                reason: self.rejection_reason(),
            });
        }

        let raw_number = self
            .numero_factura
            .as_deref()
            .ok_or_else(|| FiscalError::InvalidResponse("acceptance without numeroFactura".to_string()))?;

        let number = raw_number
            .parse()
            .map_err(|_| FiscalError::InvalidResponse(format!("malformed numeroFactura {raw_number:?}")))?;

        let cae = self
            .cae
            .filter(|c| !c.is_empty())
            .ok_or_else(|| FiscalError::InvalidResponse("acceptance without CAE".to_string()))?;

        let cae_due_date = self.vencimiento_cae.unwrap_or_default();

        Ok(CaeAuthorization {
            number,
            cae,
            cae_due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::Money;

    #[test]
    fn test_request_uses_backend_field_names() {
        let receptor = Receptor {
            name: "Marta Giménez".to_string(),
            doc_type: 80,
            doc_number: 27223334445,
        };
        let date = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        let request = InvoiceRequest::new(
            &receptor,
            Money::from_cents(24_200),
            Money::from_cents(20_000),
            date,
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cliente"]["nombre"], "Marta Giménez");
        assert_eq!(json["cliente"]["tipoDoc"], 80);
        assert_eq!(json["cliente"]["nroDoc"], 27223334445u64);
        assert_eq!(json["importeTotal"], 242.0);
        assert_eq!(json["importeNeto"], 200.0);
        assert_eq!(json["fecha"], "20260822");
    }

    #[test]
    fn test_acceptance_parses_into_authorization() {
        let body = r#"{
            "Resultado": "A",
            "numeroFactura": "0003-00000050",
            "cae": "74123456789012",
            "vencimientoCae": "2026-09-01"
        }"#;
        let response: InvoiceResponse = serde_json::from_str(body).unwrap();
        let auth = response.into_authorization().unwrap();

        assert_eq!(auth.number.to_string(), "0003-00000050");
        assert_eq!(auth.cae, "74123456789012");
        assert_eq!(auth.cae_due_date, "2026-09-01");
    }

    #[test]
    fn test_rejection_surfaces_observation_messages() {
        let body = r#"{
            "Resultado": "R",
            "Observaciones": {
                "Obs": [
                    { "Msg": "CUIT inexistente" },
                    { "Msg": "Verifique los datos del receptor" }
                ]
            }
        }"#;
        let response: InvoiceResponse = serde_json::from_str(body).unwrap();
        let err = response.into_authorization().unwrap_err();

        match err {
            FiscalError::Rejected { reason } => {
                assert_eq!(reason, "CUIT inexistente; Verifique los datos del receptor");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_without_observations_still_reports() {
        let body = r#"{ "Resultado": "R" }"#;
        let response: InvoiceResponse = serde_json::from_str(body).unwrap();
        let err = response.into_authorization().unwrap_err();
        assert!(matches!(err, FiscalError::Rejected { .. }));
    }

    #[test]
    fn test_acceptance_missing_cae_is_invalid() {
        let body = r#"{ "Resultado": "A", "numeroFactura": "0001-00000001" }"#;
        let response: InvoiceResponse = serde_json::from_str(body).unwrap();
        let err = response.into_authorization().unwrap_err();
        assert!(matches!(err, FiscalError::InvalidResponse(_)));
    }
}
