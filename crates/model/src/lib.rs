//! gatepass-model: shared types for the checkpoint validation client.
//!
//! Holds the typed outcome and history structs, the uniform
//! success/failure [`Envelope`], and the single boundary mapping from
//! backend wire records into client-side entries. Both the gateway and
//! the controller depend on this crate so that JSON shapes are parsed
//! in exactly one place.

pub mod envelope;
pub mod types;
pub mod wire;

pub use envelope::{ApiError, Envelope, EnvelopeError};
pub use types::*;
pub use wire::{RecentValidationRecord, RecentValidationsPayload};
