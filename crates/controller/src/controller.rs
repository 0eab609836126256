use gatepass_gateway::ValidationGateway;
use gatepass_model::Envelope;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::snapshot::{ValidationSnapshot, ValidationState};

#[derive(Debug, Clone, Copy)]
enum Submission {
    Code,
    Qr,
}

/// Drives a [`ValidationSnapshot`] from gateway responses.
///
/// The snapshot lives in a `watch` channel: [`snapshot`](Self::snapshot)
/// returns a copy, [`subscribe`](Self::subscribe) yields every replacement.
/// Each validation attempt takes a ticket when it enters `loading`; a
/// response is applied only while its ticket is still the newest, so a
/// slow earlier request cannot overwrite a later verdict.
pub struct ValidationController<G> {
    gateway: G,
    state: watch::Sender<ValidationSnapshot>,
}

impl<G: ValidationGateway> ValidationController<G> {
    pub fn new(gateway: G) -> Self {
        let (state, _) = watch::channel(ValidationSnapshot::default());
        ValidationController { gateway, state }
    }

    /// Build a controller and load the officer's recent history.
    pub async fn mount(gateway: G) -> Self {
        let controller = Self::new(gateway);
        controller.fetch_history().await;
        controller
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshot(&self) -> ValidationSnapshot {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> ValidationState {
        self.state.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<ValidationSnapshot> {
        self.state.subscribe()
    }

    /// Validate a manually typed access code, then refresh history.
    pub async fn validate(&self, code: &str) {
        self.submit(Submission::Code, code).await;
    }

    /// Validate a decoded QR payload, then refresh history.
    pub async fn validate_qr(&self, data: &str) {
        self.submit(Submission::Qr, data).await;
    }

    /// Replace the history list with the backend's current one.
    ///
    /// Failures are logged and leave the existing list and verdict as they are.
    pub async fn fetch_history(&self) {
        match self.gateway.fetch_history().await {
            Ok(Envelope::Success(page)) => {
                debug!(entries = page.entries.len(), "history refreshed");
                self.state
                    .send_modify(|snap| *snap = std::mem::take(snap).with_history(page.entries));
            }
            Ok(Envelope::Failure(err)) => {
                warn!(code = ?err.code, message = %err.message, "failed to fetch recent validations");
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch recent validations");
            }
        }
    }

    /// Return to `idle`, clearing the verdict but keeping history.
    pub fn reset(&self) {
        self.state
            .send_modify(|snap| *snap = std::mem::take(snap).reset());
    }

    async fn submit(&self, kind: Submission, input: &str) {
        let mut ticket = 0;
        self.state.send_modify(|snap| {
            let next = std::mem::take(snap).begin();
            ticket = next.attempt();
            *snap = next;
        });
        debug!(?kind, ticket, "validation started");

        let result = match kind {
            Submission::Code => self.gateway.validate_by_code(input).await,
            Submission::Qr => self.gateway.validate_by_qr(input).await,
        };

        if let Err(ref e) = result {
            error!(?kind, error = %e, "validation request did not complete");
        }

        let applied = self.state.send_if_modified(|snap| {
            if snap.attempt() != ticket {
                return false;
            }
            *snap = std::mem::take(snap).settle(result);
            true
        });

        if applied {
            let snap = self.state.borrow();
            info!(?kind, ticket, state = %snap.state, "validation settled");
        } else {
            debug!(?kind, ticket, "discarding response for superseded attempt");
        }

        self.fetch_history().await;
    }
}
