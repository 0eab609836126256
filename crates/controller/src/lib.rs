//! gatepass-controller: the checkpoint's validation state machine.
//!
//! A [`ValidationController`] owns one [`ValidationSnapshot`] and drives it
//! through `idle → loading → {success | denied | error}` in response to
//! gateway envelopes. Every change replaces the snapshot in a single step,
//! so readers never observe a half-applied transition.

mod controller;
mod snapshot;

pub use controller::ValidationController;
pub use snapshot::{
    ValidationSnapshot, ValidationState, ACCESS_DENIED_FALLBACK, VALIDATION_FAILED_FALLBACK,
};
