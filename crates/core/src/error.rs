//! Domain error type shared by every crate in the workspace.

use crate::types::GenerationId;

/// Domain-level error type shared across the client core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A request failed pre-dispatch validation. Surfaced synchronously
    /// to the caller, before any network call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist locally.
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: &'static str,
        id: GenerationId,
    },

    /// The estimated cost exceeds the caller's known balance.
    #[error("Insufficient credits: {required:.2} required, {available:.2} available")]
    InsufficientCredits { required: f64, available: f64 },

    /// An internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}
