//! # Fiscal Authority Client
//!
//! The HTTP conversation with the AFIP invoicing backend, behind a trait so
//! checkout logic can run against an in-process double.
//!
//! ## The Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CheckoutService<F: FiscalAuthority>                                   │
//! │        │                                                                │
//! │        ├── production:  AfipClient ──HTTP──▶ invoicing backend         │
//! │        │                                                                │
//! │        └── tests:       any impl that answers from memory              │
//! │                                                                         │
//! │  The trait is the ONLY place checkout learns about fiscal emission.    │
//! │  No HTTP types leak upward; no ledger types leak downward.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{FiscalError, FiscalResult};
use crate::wire::{InvoiceRequest, InvoiceResponse};
use pampa_core::CaeAuthorization;

/// Emission path for the factura C endpoint, relative to the base URL.
const EMIT_PATH: &str = "/api/afip/emitir-factura-c";

/// Anything that can turn an invoice request into an authorization.
#[async_trait]
pub trait FiscalAuthority: Send + Sync {
    /// Emits a Factura C and returns the authorization, or why not.
    async fn emit_factura_c(&self, request: InvoiceRequest) -> FiscalResult<CaeAuthorization>;
}

/// HTTP client for the AFIP invoicing backend.
#[derive(Debug, Clone)]
pub struct AfipClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AfipClient {
    /// Creates a client against the given backend.
    ///
    /// ## Errors
    /// `InvalidConfig` if the base URL is empty or not http(s).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FiscalResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(FiscalError::InvalidConfig(
                "AFIP base URL is empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FiscalError::InvalidConfig(format!(
                "AFIP base URL must be http(s), got {base_url:?}"
            )));
        }

        Ok(AfipClient {
            http: reqwest::Client::new(),
            base_url,
            timeout,
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl FiscalAuthority for AfipClient {
    async fn emit_factura_c(&self, request: InvoiceRequest) -> FiscalResult<CaeAuthorization> {
        let url = format!("{}{}", self.base_url, EMIT_PATH);

        debug!(
            url = %url,
            total = request.importe_total,
            doc_type = request.cliente.tipo_doc,
            "Emitting factura C"
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FiscalError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    FiscalError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "AFIP backend returned non-success status");
            return Err(FiscalError::ServerError {
                status: status.as_u16(),
            });
        }

        let body: InvoiceResponse = response
            .json()
            .await
            .map_err(|e| FiscalError::InvalidResponse(e.to_string()))?;

        let authorization = body.into_authorization()?;

        debug!(
            number = %authorization.number,
            cae = %authorization.cae,
            "Factura C authorized"
        );

        Ok(authorization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let err = AfipClient::new("", Duration::from_secs(30)).unwrap_err();
        assert!(matches!(err, FiscalError::InvalidConfig(_)));

        let err = AfipClient::new("ftp://backend", Duration::from_secs(30)).unwrap_err();
        assert!(matches!(err, FiscalError::InvalidConfig(_)));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = AfipClient::new("https://backend.example/", Duration::from_secs(30)).unwrap();
        assert_eq!(client.base_url, "https://backend.example");
    }
}
