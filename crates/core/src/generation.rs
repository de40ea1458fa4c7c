//! Generation record types, status state machine, and invariants.
//!
//! A [`GenerationRecord`] is the unit tracked by the queue reconciler:
//! created optimistically at submission time with status
//! [`GenerationStatus::Pending`], upgraded in place once the server
//! reports a terminal status, and never resurrected after an explicit
//! delete.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{GenerationId, ModelId, Timestamp, WorkspaceId};

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The kind of content a generation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Image,
    Video,
    Chat,
}

impl GenerationKind {
    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Chat => "Chat",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation. Exactly one status at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl GenerationStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Status transition rules for generation records.
///
/// The machine is deliberately small: `Pending` may move to any
/// terminal status, and terminal statuses are absorbing.
pub mod state_machine {
    use super::GenerationStatus;

    /// Returns the set of statuses reachable from `from`.
    pub fn valid_transitions(from: GenerationStatus) -> &'static [GenerationStatus] {
        match from {
            GenerationStatus::Pending => &[
                GenerationStatus::Completed,
                GenerationStatus::Failed,
                GenerationStatus::Cancelled,
            ],
            // Terminal states: no further transitions.
            GenerationStatus::Completed
            | GenerationStatus::Failed
            | GenerationStatus::Cancelled => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: GenerationStatus, to: GenerationStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a transition, returning an error message for invalid ones.
    pub fn validate_transition(
        from: GenerationStatus,
        to: GenerationStatus,
    ) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!("Invalid transition: {from:?} -> {to:?}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Error classification carried by a failed generation.
///
/// A failed generation is a valid terminal state for display purposes,
/// not a client error. Credit refunds for failures are computed
/// server-side; the client only reflects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ContentViolation,
    Timeout,
    RateLimit,
    ApiError,
    Cancelled,
    Other,
}

impl FailureKind {
    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::ContentViolation => "Content policy violation",
            Self::Timeout => "Timed out",
            Self::RateLimit => "Rate limited",
            Self::ApiError => "Provider error",
            Self::Cancelled => "Cancelled",
            Self::Other => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationRecord
// ---------------------------------------------------------------------------

/// One request for generated content and its lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Server-assigned identifier.
    pub id: GenerationId,
    /// Short identifier shown to the user.
    pub visible_id: String,
    pub kind: GenerationKind,
    pub model_id: ModelId,
    pub model_name: String,
    pub prompt: String,
    pub status: GenerationStatus,
    /// Result URI (image/video) or text (chat). Present iff `Completed`.
    pub result: Option<String>,
    /// Credits charged. May be fractional; the server total is
    /// authoritative.
    pub credits: f64,
    pub workspace_id: WorkspaceId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    /// Error classification, present only when `status` is `Failed`.
    pub failure: Option<FailureKind>,
}

impl GenerationRecord {
    /// Check the record invariant: `result` is non-null iff the status
    /// is `Completed`.
    pub fn check_result_invariant(&self) -> Result<(), CoreError> {
        let completed = self.status == GenerationStatus::Completed;
        if completed == self.result.is_some() {
            Ok(())
        } else {
            Err(CoreError::Internal(format!(
                "Record {} violates result invariant: status={:?}, result present={}",
                self.id,
                self.status,
                self.result.is_some()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
