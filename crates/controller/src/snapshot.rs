//! Controller state and its transition functions.
//!
//! Transitions consume a snapshot and return the next one. The controller
//! applies them under the state channel's lock.

use std::fmt;

use gatepass_gateway::{GatewayError, NETWORK_ERROR_MESSAGE};
use gatepass_model::{Envelope, HistoryEntry, ValidationOutcome};
use serde::Serialize;

/// Shown for a denied outcome whose `reason` is empty.
pub const ACCESS_DENIED_FALLBACK: &str = "Access denied";

/// Shown for a failure envelope whose `error.message` is empty.
pub const VALIDATION_FAILED_FALLBACK: &str = "Validation failed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    #[default]
    Idle,
    Loading,
    Success,
    Denied,
    Error,
}

impl ValidationState {
    /// True once an attempt has produced a verdict or an error.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            ValidationState::Success | ValidationState::Denied | ValidationState::Error
        )
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationState::Idle => "idle",
            ValidationState::Loading => "loading",
            ValidationState::Success => "success",
            ValidationState::Denied => "denied",
            ValidationState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Everything the officer's screen shows, as one immutable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSnapshot {
    pub state: ValidationState,
    pub outcome: Option<ValidationOutcome>,
    pub history: Vec<HistoryEntry>,
    pub error_message: Option<String>,
    /// Ticket of the newest attempt; responses for older tickets are dropped.
    #[serde(skip)]
    attempt: u64,
}

impl ValidationSnapshot {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Start a new attempt: drop the previous verdict and take the next ticket.
    pub(crate) fn begin(self) -> Self {
        ValidationSnapshot {
            state: ValidationState::Loading,
            outcome: None,
            error_message: None,
            attempt: self.attempt + 1,
            history: self.history,
        }
    }

    /// Apply what the gateway returned for the current attempt.
    pub(crate) fn settle(
        self,
        result: Result<Envelope<ValidationOutcome>, GatewayError>,
    ) -> Self {
        match result {
            Ok(Envelope::Success(outcome)) => self.with_outcome(outcome),
            Ok(Envelope::Failure(err)) => {
                let message = if err.message.is_empty() {
                    VALIDATION_FAILED_FALLBACK.to_string()
                } else {
                    err.message
                };
                self.with_error(message)
            }
            Err(_) => self.with_error(NETWORK_ERROR_MESSAGE.to_string()),
        }
    }

    fn with_outcome(self, outcome: ValidationOutcome) -> Self {
        let (state, error_message) = if outcome.result.is_granted() {
            (ValidationState::Success, None)
        } else if outcome.reason.is_empty() {
            (
                ValidationState::Denied,
                Some(ACCESS_DENIED_FALLBACK.to_string()),
            )
        } else {
            (ValidationState::Denied, Some(outcome.reason.clone()))
        };
        ValidationSnapshot {
            state,
            error_message,
            outcome: Some(outcome),
            ..self
        }
    }

    fn with_error(self, message: String) -> Self {
        ValidationSnapshot {
            state: ValidationState::Error,
            outcome: None,
            error_message: Some(message),
            ..self
        }
    }

    pub(crate) fn with_history(self, history: Vec<HistoryEntry>) -> Self {
        ValidationSnapshot { history, ..self }
    }

    /// Back to idle. The ticket advances so in-flight responses are dropped.
    pub(crate) fn reset(self) -> Self {
        ValidationSnapshot {
            state: ValidationState::Idle,
            outcome: None,
            error_message: None,
            attempt: self.attempt + 1,
            history: self.history,
        }
    }
}
