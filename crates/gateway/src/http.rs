//! HTTP gateway: talks to the checkpoint backend's `/security` routes.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. The agent is built with
//! `http_status_as_error(false)` so that 4xx/5xx bodies can still be read
//! as structured failure envelopes.

use async_trait::async_trait;
use gatepass_model::{Envelope, HistoryPage, RecentValidationsPayload, ValidationOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Endpoint, GatewayConfig};
use crate::{
    GatewayError, ValidationGateway, INVALID_RESPONSE_CODE, NETWORK_ERROR_CODE,
    NETWORK_ERROR_MESSAGE,
};

#[derive(Serialize)]
struct ValidateCodeRequest<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct ValidateQrRequest<'a> {
    qr_data: &'a str,
}

/// Gateway backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct HttpGateway {
    agent: ureq::Agent,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build();
        HttpGateway {
            agent: ureq::Agent::new_with_config(agent_config),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Issue one request and fold the outcome into an envelope.
    ///
    /// `body` of `None` means GET; anything else is POSTed as JSON.
    async fn exchange<T>(
        &self,
        endpoint: Endpoint,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope<T>, GatewayError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.config.endpoint_url(endpoint);
        let agent = self.agent.clone();
        let auth = self
            .config
            .auth_token
            .as_ref()
            .map(|token| format!("Bearer {}", token));

        let method = if body.is_some() { "POST" } else { "GET" };
        debug!(%url, method, "sending request");

        tokio::task::spawn_blocking(move || {
            let response = match body {
                Some(json) => {
                    let mut request = agent.post(&url).header("Accept", "application/json");
                    if let Some(ref value) = auth {
                        request = request.header("Authorization", value);
                    }
                    request.send_json(&json)
                }
                None => {
                    let mut request = agent.get(&url).header("Accept", "application/json");
                    if let Some(ref value) = auth {
                        request = request.header("Authorization", value);
                    }
                    request.call()
                }
            };

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.into_body().read_to_string() {
                        Ok(text) => normalize_response(&url, status, &text),
                        Err(e) => transport_failure(&url, &e),
                    }
                }
                Err(e) => transport_failure(&url, &e),
            }
        })
        .await
        .map_err(|e| GatewayError::TaskFailed(e.to_string()))
    }
}

/// Turn a status code and body into an envelope.
///
/// - A body that parses as an envelope is returned as sent, whatever the status.
/// - A 2xx body that does not parse becomes `INVALID_RESPONSE` with the generic message.
/// - Any other status with an unparseable body becomes `HTTP_<status>`.
pub(crate) fn normalize_response<T: DeserializeOwned>(
    url: &str,
    status: u16,
    body: &str,
) -> Envelope<T> {
    match Envelope::from_body(body) {
        Ok(envelope) => {
            if let Envelope::Failure(ref err) = envelope {
                warn!(%url, status, code = ?err.code, message = %err.message, "request failed");
            }
            envelope
        }
        Err(e) if (200..300).contains(&status) => {
            warn!(%url, status, error = %e, "unreadable response envelope");
            Envelope::failure(NETWORK_ERROR_MESSAGE, INVALID_RESPONSE_CODE)
        }
        Err(e) => {
            warn!(%url, status, error = %e, "request failed without an envelope");
            Envelope::failure(
                format!("Request failed with status {}", status),
                format!("HTTP_{}", status),
            )
        }
    }
}

fn transport_failure<T>(url: &str, error: &dyn std::fmt::Display) -> Envelope<T> {
    warn!(%url, %error, "transport failure");
    Envelope::failure(NETWORK_ERROR_MESSAGE, NETWORK_ERROR_CODE)
}

fn to_json<S: Serialize>(body: &S) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(body).map_err(|e| GatewayError::TaskFailed(e.to_string()))
}

#[async_trait]
impl ValidationGateway for HttpGateway {
    async fn validate_by_code(
        &self,
        code: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError> {
        let body = to_json(&ValidateCodeRequest { code })?;
        self.exchange(Endpoint::Validate, Some(body)).await
    }

    async fn validate_by_qr(
        &self,
        payload: &str,
    ) -> Result<Envelope<ValidationOutcome>, GatewayError> {
        let body = to_json(&ValidateQrRequest { qr_data: payload })?;
        self.exchange(Endpoint::ValidateQr, Some(body)).await
    }

    async fn fetch_history(&self) -> Result<Envelope<HistoryPage>, GatewayError> {
        let envelope: Envelope<RecentValidationsPayload> =
            self.exchange(Endpoint::RecentValidations, None).await?;
        Ok(envelope.map(HistoryPage::from))
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
