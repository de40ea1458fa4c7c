//! Request/response payloads exchanged with the platform API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use polymuse_core::generation::{GenerationKind, GenerationRecord};
use polymuse_core::types::{ModelId, WorkspaceId};

/// Body of `POST /api/v1/pricing/quote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub model_id: ModelId,
    /// Option set to price. For image kinds the requested quantity is
    /// folded in as `num_images` before the call.
    pub options: HashMap<String, serde_json::Value>,
}

/// Response of the quote endpoint: a base cost in USD, before margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub price: f64,
}

/// Body of `POST /api/v1/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub kind: GenerationKind,
    pub model_id: ModelId,
    pub prompt: String,
    pub options: HashMap<String, serde_json::Value>,
    pub reference_images: Vec<String>,
    pub workspace_id: WorkspaceId,
}

/// Response after queuing one submission.
///
/// A single submission may yield several sub-generations (e.g. a
/// multi-image request); `credits_charged` is the total for the whole
/// submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub generations: Vec<GenerationRecord>,
    pub credits_charged: f64,
    pub remaining_balance: f64,
}

/// Per-kind generation counts for a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationCounts {
    pub image: u32,
    pub video: u32,
    pub chat: u32,
}

/// Response of `GET /api/v1/workspaces/{id}/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub generations: Vec<GenerationRecord>,
    pub counts: GenerationCounts,
}

/// Body of `POST /api/v1/generations/bulk-delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Response of `GET /api/v1/account/balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_serializes_kind_snake_case() {
        let req = SubmitRequest {
            kind: GenerationKind::Image,
            model_id: "m1".into(),
            prompt: "a cat".into(),
            options: Default::default(),
            reference_images: vec![],
            workspace_id: "ws-1".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["model_id"], "m1");
    }

    #[test]
    fn list_response_parses_counts() {
        let json = r#"{
            "generations": [],
            "counts": {"image": 3, "video": 1, "chat": 0}
        }"#;
        let parsed: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.counts.image, 3);
        assert_eq!(parsed.counts.video, 1);
        assert!(parsed.generations.is_empty());
    }
}
