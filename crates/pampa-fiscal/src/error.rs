//! # Fiscal Error Types
//!
//! Error taxonomy for the AFIP conversation.
//!
//! ## Three Remote Failures, Three Different Operator Messages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Timeout      → "AFIP no responde" — try again, nothing was recorded   │
//! │  Rejected     → the authority said NO and told us why; show the reason │
//! │  ServerError  → the backend broke; not the operator's fault            │
//! │                                                                         │
//! │  Collapsing these into one "fiscal error" message would leave the      │
//! │  operator guessing whether to retry, fix the client data, or call      │
//! │  support.                                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from the fiscal authority client.
#[derive(Debug, Error)]
pub enum FiscalError {
    /// The backend did not answer within the configured window.
    #[error("AFIP request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The authority processed the request and refused it.
    #[error("AFIP rejected the invoice: {reason}")]
    Rejected { reason: String },

    /// The backend answered with a non-success HTTP status.
    #[error("AFIP backend error (HTTP {status})")]
    ServerError { status: u16 },

    /// The request never completed (DNS, connect, TLS, mid-body drop).
    #[error("could not reach AFIP backend: {0}")]
    Transport(String),

    /// The backend answered 200 but the body made no sense.
    #[error("unexpected AFIP response: {0}")]
    InvalidResponse(String),

    /// A payload could not be encoded for transmission.
    #[error("failed to encode fiscal payload: {0}")]
    Encoding(String),

    /// Client construction failed.
    #[error("invalid fiscal configuration: {0}")]
    InvalidConfig(String),
}

impl FiscalError {
    /// True when the failure happened before the authority had a chance to
    /// decide anything; retrying is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FiscalError::Timeout { .. } | FiscalError::Transport(_) | FiscalError::ServerError { .. }
        )
    }
}

/// Result type alias for fiscal operations.
pub type FiscalResult<T> = Result<T, FiscalError>;
