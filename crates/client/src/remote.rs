//! The remote API seam.
//!
//! [`RemoteApi`] abstracts the platform's HTTP surface so the queue
//! layer can be driven by [`crate::api::PlatformApi`] in production
//! and by an in-memory fake in tests.

use std::collections::HashMap;

use async_trait::async_trait;

use polymuse_core::model::ModelInfo;
use polymuse_core::pricing::PricingConfig;

use crate::api::ApiError;
use crate::wire::{ListResponse, QuoteResponse, SubmitRequest, SubmitResponse};

/// The logical operations the client core issues against the server.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch the model catalog.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;

    /// Fetch the public pricing configuration.
    async fn pricing_config(&self) -> Result<PricingConfig, ApiError>;

    /// Server-side price quote for one model + option set. Returns a
    /// base USD cost, before margin.
    async fn quote(
        &self,
        model_id: &str,
        options: &HashMap<String, serde_json::Value>,
    ) -> Result<QuoteResponse, ApiError>;

    /// Authoritative generation list + per-kind counts for a workspace.
    async fn list_generations(&self, workspace_id: &str) -> Result<ListResponse, ApiError>;

    /// Queue one generation submission.
    async fn submit_generation(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError>;

    /// Delete a single generation.
    async fn delete_generation(&self, id: &str) -> Result<(), ApiError>;

    /// Delete a batch of generations atomically.
    async fn delete_generations(&self, ids: &[String]) -> Result<(), ApiError>;

    /// Current credit balance for the authenticated account.
    async fn balance(&self) -> Result<f64, ApiError>;
}
