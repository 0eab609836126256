//! Validation gateway abstraction.
//!
//! [`ValidationGateway`] issues the three checkpoint calls against a
//! remote service and hands back an [`Envelope`] for each. Transport and
//! parse failures are folded into failure envelopes by the implementation,
//! so the only error a caller can see is one that escaped the transport
//! layer entirely (see [`GatewayError`]).

pub mod config;
pub mod http;

use async_trait::async_trait;
use gatepass_model::{Envelope, HistoryPage, ValidationOutcome};

pub use config::{ConfigError, Endpoint, GatewayConfig};
pub use http::HttpGateway;

/// Message shown for failures that carry no structured detail.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred.";

/// Failure code for transport errors (unreachable host, timeout, TLS, I/O).
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";

/// Failure code for a 2xx response whose body is not a valid envelope.
pub const INVALID_RESPONSE_CODE: &str = "INVALID_RESPONSE";

/// Errors that escape the gateway instead of becoming failure envelopes.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request task panicked or was cancelled before producing a response.
    #[error("gateway request task failed: {0}")]
    TaskFailed(String),
}

/// Remote operations used by the validation controller.
///
/// Implementations must fold every transport and parse failure into
/// [`Envelope::Failure`]; `Err` is reserved for failures of the calling
/// machinery itself.
#[async_trait]
pub trait ValidationGateway: Send + Sync {
    /// Validate a manually typed access code. The code is sent as typed.
    async fn validate_by_code(
        &self,
        code: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError>;

    /// Validate the raw string decoded from a visitor's QR code.
    async fn validate_by_qr(
        &self,
        payload: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError>;

    /// Fetch the calling officer's recent validations, newest first.
    async fn fetch_history(&self) -> Result<Envelope<HistoryPage>, GatewayError>;
}

#[async_trait]
impl<G: ValidationGateway + ?Sized> ValidationGateway for std::sync::Arc<G> {
    async fn validate_by_code(
        &self,
        code: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError> {
        (**self).validate_by_code(code).await
    }

    async fn validate_by_qr(
        &self,
        payload: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError> {
        (**self).validate_by_qr(payload).await
    }

    async fn fetch_history(&self) -> Result<Envelope<HistoryPage>, GatewayError> {
        (**self).fetch_history().await
    }
}
