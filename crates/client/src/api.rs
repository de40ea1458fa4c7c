//! HTTP implementation of the platform API.
//!
//! Wraps the platform REST endpoints (model catalog, pricing, quotes,
//! generation CRUD, balance) using [`reqwest`]. User-scoped calls
//! carry a bearer token.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use polymuse_core::model::ModelInfo;
use polymuse_core::pricing::PricingConfig;

use crate::remote::RemoteApi;
use crate::wire::{
    BalanceResponse, BulkDeleteRequest, ListResponse, QuoteRequest, QuoteResponse, SubmitRequest,
    SubmitResponse,
};

/// HTTP client for the platform API.
pub struct PlatformApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

/// Errors from the platform REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl PlatformApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://api.polymuse.app`.
    /// * `bearer_token` - Token attached to user-scoped calls.
    pub fn new(base_url: String, bearer_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            bearer_token,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, base_url: String, bearer_token: String) -> Self {
        Self {
            client,
            base_url,
            bearer_token,
        }
    }

    /// Base HTTP URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- private helpers ----

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.bearer_token)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.bearer_token)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for PlatformApi {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let response = self.get("/api/v1/models").send().await?;
        Self::parse_response(response).await
    }

    async fn pricing_config(&self) -> Result<PricingConfig, ApiError> {
        let response = self.get("/api/v1/pricing").send().await?;
        Self::parse_response(response).await
    }

    async fn quote(
        &self,
        model_id: &str,
        options: &HashMap<String, serde_json::Value>,
    ) -> Result<QuoteResponse, ApiError> {
        let body = QuoteRequest {
            model_id: model_id.to_string(),
            options: options.clone(),
        };
        let response = self.post("/api/v1/pricing/quote").json(&body).send().await?;
        Self::parse_response(response).await
    }

    async fn list_generations(&self, workspace_id: &str) -> Result<ListResponse, ApiError> {
        let response = self
            .get(&format!("/api/v1/workspaces/{workspace_id}/generations"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn submit_generation(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError> {
        // Correlation id so server logs can be tied back to this client.
        let client_request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            model_id = %request.model_id,
            workspace_id = %request.workspace_id,
            client_request_id = %client_request_id,
            "Submitting generation",
        );
        let response = self
            .post("/api/v1/generations")
            .header("x-client-request-id", client_request_id)
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete_generation(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/api/v1/generations/{id}", self.base_url))
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn delete_generations(&self, ids: &[String]) -> Result<(), ApiError> {
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        let response = self
            .post("/api/v1/generations/bulk-delete")
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn balance(&self) -> Result<f64, ApiError> {
        let response = self.get("/api/v1/account/balance").send().await?;
        let parsed: BalanceResponse = Self::parse_response(response).await?;
        Ok(parsed.balance)
    }
}
