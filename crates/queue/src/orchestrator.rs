//! Submission orchestration: one user request, one-or-many remote
//! submissions.
//!
//! Validation failures reject the whole submission before any network
//! call. Once dispatch starts, each target model's request is
//! independent: a failure on one model neither cancels nor rolls back
//! the others. Total failure is an error; partial success is success,
//! and callers compare the outcome's counts to detect it.

use polymuse_client::wire::{SubmitRequest, SubmitResponse};
use polymuse_client::RemoteApi;
use polymuse_core::generation::GenerationRecord;
use polymuse_core::model::ModelInfo;
use polymuse_core::request::{self, GenerationRequest};
use polymuse_core::types::ModelId;

use crate::error::QueueError;

// ---------------------------------------------------------------------------
// SubmissionOutcome
// ---------------------------------------------------------------------------

/// Aggregate result of a (possibly multi-model) submission.
#[derive(Debug, Default)]
pub struct SubmissionOutcome {
    /// Successfully created records, in the order the per-model calls
    /// resolved. All start `Pending`.
    pub records: Vec<GenerationRecord>,
    /// Number of target models requested.
    pub requested_models: usize,
    /// Number of models whose submission succeeded.
    pub succeeded_models: usize,
    /// Per-model failures, in dispatch order.
    pub failures: Vec<(ModelId, String)>,
    /// Sum of the per-model reported charges. The server remains
    /// authoritative for the actual balance movement.
    pub total_credits: f64,
    /// Balance reported by the last successful submission.
    pub remaining_balance: Option<f64>,
}

impl SubmissionOutcome {
    /// Whether some, but not all, target models succeeded.
    pub fn is_partial(&self) -> bool {
        self.succeeded_models > 0 && self.succeeded_models < self.requested_models
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Validate and dispatch a submission to every target model.
///
/// * `estimated_total` / `balance` feed the funds check, which runs
///   with the validation pass, before any network call.
///
/// Returns the aggregate outcome; errors only on validation failure or
/// when every model's request fails.
pub async fn submit(
    remote: &dyn RemoteApi,
    request: &GenerationRequest,
    targets: &[ModelInfo],
    estimated_total: f64,
    balance: f64,
) -> Result<SubmissionOutcome, QueueError> {
    // Fail fast: no partial dispatch for validation errors.
    request::validate_submission(request, targets)?;
    request::validate_funds(estimated_total, balance)?;

    let mut outcome = SubmissionOutcome {
        requested_models: targets.len(),
        ..Default::default()
    };

    for model in targets {
        let wire_request = SubmitRequest {
            kind: model.kind,
            model_id: model.id.clone(),
            prompt: request.prompt.clone(),
            options: request.options_for(&model.id).clone(),
            reference_images: request.reference_images.clone(),
            workspace_id: request.workspace_id.clone(),
        };

        match remote.submit_generation(&wire_request).await {
            Ok(response) => {
                outcome.succeeded_models += 1;
                outcome.total_credits += response.credits_charged;
                outcome.remaining_balance = Some(response.remaining_balance);
                outcome.records.extend(distribute_credits(response));
            }
            Err(e) => {
                tracing::warn!(
                    model_id = %model.id,
                    error = %e,
                    "Model submission failed; continuing with remaining models",
                );
                outcome.failures.push((model.id.clone(), e.to_string()));
            }
        }
    }

    if outcome.succeeded_models == 0 {
        return Err(QueueError::AllSubmissionsFailed {
            count: outcome.requested_models,
            failures: outcome.failures,
        });
    }

    Ok(outcome)
}

/// Spread the submission's total charge evenly across its
/// sub-generations.
///
/// Display-only: the server's total stays authoritative.
fn distribute_credits(response: SubmitResponse) -> Vec<GenerationRecord> {
    let n = response.generations.len();
    if n == 0 {
        return Vec::new();
    }
    let per_record = response.credits_charged / n as f64;
    response
        .generations
        .into_iter()
        .map(|mut record| {
            record.credits = per_record;
            record
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
