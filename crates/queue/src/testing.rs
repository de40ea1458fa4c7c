//! In-memory [`RemoteApi`] fake with programmable failures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use polymuse_client::wire::{
    GenerationCounts, ListResponse, QuoteResponse, SubmitRequest, SubmitResponse,
};
use polymuse_client::{ApiError, RemoteApi};
use polymuse_core::generation::{GenerationRecord, GenerationStatus};
use polymuse_core::model::ModelInfo;
use polymuse_core::pricing::PricingConfig;

fn api_error(body: &str) -> ApiError {
    ApiError::Api {
        status: 500,
        body: body.to_string(),
    }
}

/// Programmable stand-in for the platform server.
pub struct FakeRemote {
    models: Vec<ModelInfo>,
    pricing: PricingConfig,
    balance: f64,
    quote_price: f64,
    fail_quote: bool,
    fail_list: bool,
    fail_delete: bool,
    fail_bulk_delete: bool,
    /// Model ids whose submissions fail.
    failing_models: HashSet<String>,
    /// Sub-generations returned per successful submission.
    subgenerations: usize,
    /// Total credits charged per successful submission.
    submit_credits: f64,
    list_response: Mutex<ListResponse>,
    next_id: AtomicUsize,

    /// Every submit request received, in order.
    pub submitted: Mutex<Vec<SubmitRequest>>,
    /// Every id passed to `delete_generation`.
    pub deleted: Mutex<Vec<String>>,
    /// Every batch passed to `delete_generations`.
    pub bulk_deleted: Mutex<Vec<Vec<String>>>,
    /// Number of `list_generations` calls served.
    pub list_calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            pricing: PricingConfig::default(),
            balance: 1_000.0,
            quote_price: 0.05,
            fail_quote: false,
            fail_list: false,
            fail_delete: false,
            fail_bulk_delete: false,
            failing_models: HashSet::new(),
            subgenerations: 1,
            submit_credits: 5.0,
            list_response: Mutex::new(ListResponse {
                generations: Vec::new(),
                counts: GenerationCounts::default(),
            }),
            next_id: AtomicUsize::new(1),
            submitted: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            bulk_deleted: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_quote_price(mut self, price: f64) -> Self {
        self.quote_price = price;
        self
    }

    pub fn with_quote_failure(mut self) -> Self {
        self.fail_quote = true;
        self
    }

    pub fn with_list_failure(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn with_delete_failure(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn with_bulk_delete_failure(mut self) -> Self {
        self.fail_bulk_delete = true;
        self
    }

    pub fn with_failing_model(mut self, model_id: &str) -> Self {
        self.failing_models.insert(model_id.to_string());
        self
    }

    pub fn with_subgenerations(mut self, n: usize) -> Self {
        self.subgenerations = n;
        self
    }

    pub fn with_submit_credits(mut self, credits: f64) -> Self {
        self.submit_credits = credits;
        self
    }

    /// Replace the snapshot served by `list_generations`.
    pub fn set_list_response(&self, response: ListResponse) {
        *self.list_response.lock().unwrap() = response;
    }
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteApi for FakeRemote {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        Ok(self.models.clone())
    }

    async fn pricing_config(&self) -> Result<PricingConfig, ApiError> {
        Ok(self.pricing.clone())
    }

    async fn quote(
        &self,
        _model_id: &str,
        _options: &HashMap<String, serde_json::Value>,
    ) -> Result<QuoteResponse, ApiError> {
        if self.fail_quote {
            return Err(api_error("quote unavailable"));
        }
        Ok(QuoteResponse {
            price: self.quote_price,
        })
    }

    async fn list_generations(&self, _workspace_id: &str) -> Result<ListResponse, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(api_error("list unavailable"));
        }
        Ok(self.list_response.lock().unwrap().clone())
    }

    async fn submit_generation(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError> {
        self.submitted.lock().unwrap().push(request.clone());

        if self.failing_models.contains(&request.model_id) {
            return Err(api_error("model unavailable"));
        }

        let generations: Vec<GenerationRecord> = (0..self.subgenerations.max(1))
            .map(|_| {
                let seq = self.next_id.fetch_add(1, Ordering::SeqCst);
                GenerationRecord {
                    id: format!("gen-{}-{seq}", request.model_id),
                    visible_id: format!("G-{seq:04}"),
                    kind: request.kind,
                    model_id: request.model_id.clone(),
                    model_name: format!("Model {}", request.model_id),
                    prompt: request.prompt.clone(),
                    status: GenerationStatus::Pending,
                    result: None,
                    credits: 0.0,
                    workspace_id: request.workspace_id.clone(),
                    started_at: chrono::Utc::now(),
                    completed_at: None,
                    failure: None,
                }
            })
            .collect();

        Ok(SubmitResponse {
            generations,
            credits_charged: self.submit_credits,
            remaining_balance: self.balance - self.submit_credits,
        })
    }

    async fn delete_generation(&self, id: &str) -> Result<(), ApiError> {
        self.deleted.lock().unwrap().push(id.to_string());
        if self.fail_delete {
            return Err(api_error("delete failed"));
        }
        Ok(())
    }

    async fn delete_generations(&self, ids: &[String]) -> Result<(), ApiError> {
        self.bulk_deleted.lock().unwrap().push(ids.to_vec());
        if self.fail_bulk_delete {
            return Err(api_error("bulk delete failed"));
        }
        Ok(())
    }

    async fn balance(&self) -> Result<f64, ApiError> {
        Ok(self.balance)
    }
}
