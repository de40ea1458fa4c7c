//! User-constructed submission requests and fail-fast validation.
//!
//! Validation errors reject the whole submission before any network
//! call; there is no partial dispatch for a request that fails these
//! checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::model::ModelInfo;
use crate::types::{ModelId, WorkspaceId};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of reference images per request.
pub const MAX_REFERENCE_IMAGES: usize = 4;

/// Maximum number of target models in a multi-model submission.
pub const MAX_TARGET_MODELS: usize = 4;

/// Maximum prompt length accepted client-side.
pub const MAX_PROMPT_CHARS: u64 = 10_000;

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// An ephemeral, user-constructed generation request.
///
/// Consumed immediately by the submission orchestrator and not
/// retained afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    #[validate(length(max = MAX_PROMPT_CHARS))]
    pub prompt: String,
    /// Reference image URIs or encoded blobs (0–4).
    pub reference_images: Vec<String>,
    /// Requested quantity. Only meaningful for image kinds.
    pub quantity: u32,
    /// Option map shared by every target model.
    pub options: HashMap<String, serde_json::Value>,
    /// Per-model option overrides, collected through a secondary
    /// confirmation step. When present for a model, replaces the
    /// shared options for that model's dispatch.
    pub per_model_options: HashMap<ModelId, HashMap<String, serde_json::Value>>,
    pub workspace_id: WorkspaceId,
}

impl GenerationRequest {
    /// Options to dispatch for a specific model: the per-model override
    /// when the caller supplied one, otherwise the shared options.
    pub fn options_for(&self, model_id: &str) -> &HashMap<String, serde_json::Value> {
        self.per_model_options.get(model_id).unwrap_or(&self.options)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a submission against its target models.
///
/// Checks, in order:
/// 1. field-level bounds (prompt at most [`MAX_PROMPT_CHARS`]);
/// 2. prompt non-empty OR at least one reference image;
/// 3. 1..=[`MAX_TARGET_MODELS`] target models;
/// 4. at most [`MAX_REFERENCE_IMAGES`] reference images;
/// 5. every model that requires reference images has at least one.
pub fn validate_submission(
    request: &GenerationRequest,
    targets: &[ModelInfo],
) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    if request.prompt.trim().is_empty() && request.reference_images.is_empty() {
        return Err(CoreError::Validation(
            "Submission requires a prompt or at least one reference image".to_string(),
        ));
    }

    if targets.is_empty() {
        return Err(CoreError::Validation(
            "At least one target model must be selected".to_string(),
        ));
    }
    if targets.len() > MAX_TARGET_MODELS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_TARGET_MODELS} models per submission (got {})",
            targets.len()
        )));
    }

    if request.reference_images.len() > MAX_REFERENCE_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_REFERENCE_IMAGES} reference images per submission (got {})",
            request.reference_images.len()
        )));
    }

    for model in targets {
        if model.requires_reference_image && request.reference_images.is_empty() {
            return Err(CoreError::Validation(format!(
                "Model '{}' requires a reference image",
                model.display_name
            )));
        }
    }

    Ok(())
}

/// Reject a submission whose estimated total exceeds the caller's
/// known balance.
pub fn validate_funds(estimated_total: f64, balance: f64) -> Result<(), CoreError> {
    if estimated_total > balance {
        Err(CoreError::InsufficientCredits {
            required: estimated_total,
            available: balance,
        })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
