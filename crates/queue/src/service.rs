//! The imperative facade a rendering layer drives.
//!
//! [`QueueService`] owns the queue store, the pricing/balance caches,
//! and the poll-loop lifecycle. It is created once per workspace view
//! and torn down (via [`QueueService::shutdown`]) when the view goes
//! away. All store mutations flow through it, so the single-writer
//! discipline of the store is enforced structurally.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, RwLock};

use polymuse_client::wire::GenerationCounts;
use polymuse_client::RemoteApi;
use polymuse_core::error::CoreError;
use polymuse_core::filter::{self, GenerationFilters};
use polymuse_core::generation::GenerationRecord;
use polymuse_core::model::ModelInfo;
use polymuse_core::pricing::PricingConfig;
use polymuse_core::request::GenerationRequest;
use polymuse_core::types::{GenerationId, ModelId, WorkspaceId};
use polymuse_events::{EventBus, QueueEvent};

use crate::error::QueueError;
use crate::estimator;
use crate::orchestrator::{self, SubmissionOutcome};
use crate::poller::{self, PollHandle, PollerContext};
use crate::store::QueueStore;

/// Facade over the queue store, the submission orchestrator, the
/// estimator, and the poll scheduler. Cheap to share as `Arc`.
pub struct QueueService {
    ctx: Arc<PollerContext>,
    poll_interval: Duration,
    pricing: RwLock<PricingConfig>,
    balance: RwLock<f64>,
    models: RwLock<Vec<ModelInfo>>,
    poller: Mutex<Option<PollHandle>>,
}

impl QueueService {
    /// Create a service for one workspace view.
    ///
    /// Call [`mount`](Self::mount) afterwards to load the pricing
    /// config, model catalog, balance, and the initial generation list.
    pub fn new(
        remote: Arc<dyn RemoteApi>,
        workspace_id: WorkspaceId,
        poll_interval: Duration,
    ) -> Arc<Self> {
        let ctx = Arc::new(PollerContext {
            store: Arc::new(RwLock::new(QueueStore::new())),
            remote,
            bus: Arc::new(EventBus::default()),
            workspace_id,
        });
        Arc::new(Self {
            ctx,
            poll_interval,
            pricing: RwLock::new(PricingConfig::default()),
            balance: RwLock::new(0.0),
            models: RwLock::new(Vec::new()),
            poller: Mutex::new(None),
        })
    }

    /// Initial load: model catalog, pricing config, balance, and the
    /// workspace's current generation list.
    ///
    /// Every fetch is best-effort; a failure is logged and the stale
    /// (or default) cache stays in place. Staleness is acceptable; the
    /// server reconciles the authoritative charge at generation time.
    pub async fn mount(&self) {
        self.refresh_models().await;
        self.refresh_pricing().await;
        self.refresh_balance().await;
        self.refresh().await;
    }

    // -----------------------------------------------------------------------
    // Caches
    // -----------------------------------------------------------------------

    /// Re-fetch the model catalog, keeping the old catalog on failure.
    pub async fn refresh_models(&self) {
        match self.ctx.remote.list_models().await {
            Ok(models) => *self.models.write().await = models,
            Err(e) => tracing::warn!(error = %e, "Model catalog refresh failed"),
        }
    }

    /// Re-fetch the pricing config, keeping the old config on failure.
    pub async fn refresh_pricing(&self) {
        match self.ctx.remote.pricing_config().await {
            Ok(pricing) => *self.pricing.write().await = pricing,
            Err(e) => tracing::warn!(error = %e, "Pricing refresh failed"),
        }
    }

    /// Re-fetch the account balance, keeping the old value on failure.
    pub async fn refresh_balance(&self) {
        match self.ctx.remote.balance().await {
            Ok(balance) => *self.balance.write().await = balance,
            Err(e) => tracing::warn!(error = %e, "Balance refresh failed"),
        }
    }

    pub async fn pricing(&self) -> PricingConfig {
        self.pricing.read().await.clone()
    }

    pub async fn balance(&self) -> f64 {
        *self.balance.read().await
    }

    pub async fn models(&self) -> Vec<ModelInfo> {
        self.models.read().await.clone()
    }

    // -----------------------------------------------------------------------
    // Estimation
    // -----------------------------------------------------------------------

    /// Estimate the credit cost of submitting to `model_ids`.
    ///
    /// Only fails for an unknown model id; quote failures silently
    /// fall back to the local approximation.
    pub async fn estimate(
        &self,
        model_ids: &[ModelId],
        options: &std::collections::HashMap<String, serde_json::Value>,
        quantity: u32,
    ) -> Result<f64, QueueError> {
        let targets = self.resolve_models(model_ids).await?;
        let pricing = self.pricing().await;
        Ok(estimator::estimate(
            self.ctx.remote.as_ref(),
            &targets,
            options,
            quantity,
            &pricing,
        )
        .await)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validate, price, and dispatch a submission; insert the created
    /// records optimistically and make sure the poll loop is running.
    pub async fn submit(
        &self,
        request: &GenerationRequest,
        model_ids: &[ModelId],
    ) -> Result<SubmissionOutcome, QueueError> {
        let targets = self.resolve_models(model_ids).await?;
        let pricing = self.pricing().await;
        let estimated = estimator::estimate(
            self.ctx.remote.as_ref(),
            &targets,
            &request.options,
            request.quantity,
            &pricing,
        )
        .await;
        let balance = self.balance().await;

        let outcome =
            orchestrator::submit(self.ctx.remote.as_ref(), request, &targets, estimated, balance)
                .await?;

        if let Some(remaining) = outcome.remaining_balance {
            *self.balance.write().await = remaining;
        }

        // Prepend as a block so the resolution order survives at the
        // front of the list.
        let mut inserted: Vec<GenerationId> = Vec::new();
        {
            let mut store = self.ctx.store.write().await;
            for record in outcome.records.iter().rev() {
                if store.insert_front(record.clone()) {
                    inserted.push(record.id.clone());
                }
            }
        }
        inserted.reverse();
        if !inserted.is_empty() {
            self.ctx.bus.publish(QueueEvent::Inserted { ids: inserted });
        }

        self.ensure_polling().await;
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete one generation.
    ///
    /// Local removal is optimistic: applied immediately, not rolled
    /// back if the server call fails (the tombstone keeps the additive
    /// poll from resurrecting it). A background refresh follows either
    /// way to reconcile server-side side effects such as counts.
    pub async fn delete_one(&self, id: &str) -> Result<(), QueueError> {
        let ids = [id.to_string()];
        let removed = self.ctx.store.write().await.remove_ids(&ids);
        if !removed.is_empty() {
            self.ctx.bus.publish(QueueEvent::Removed { ids: removed });
        }

        let result = self.ctx.remote.delete_generation(id).await;
        if let Err(ref e) = result {
            tracing::warn!(id, error = %e, "Server delete failed; local removal kept");
        }

        self.refresh().await;
        result.map_err(QueueError::from)
    }

    /// Delete a batch of generations.
    ///
    /// Not optimistic: the store is left unchanged until the batch
    /// call resolves, so a failed batch removes nothing locally.
    pub async fn delete_many(&self, ids: &[GenerationId]) -> Result<(), QueueError> {
        self.ctx.remote.delete_generations(ids).await?;

        let removed = self.ctx.store.write().await.remove_ids(ids);
        if !removed.is_empty() {
            self.ctx.bus.publish(QueueEvent::Removed { ids: removed });
        }

        self.refresh().await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The filtered, ordered view of the generation list.
    pub async fn visible_list(&self, filters: &GenerationFilters) -> Vec<GenerationRecord> {
        let store = self.ctx.store.read().await;
        filter::project(store.records(), filters)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Per-kind counts as last reported by the server.
    pub async fn counts(&self) -> GenerationCounts {
        self.ctx.store.read().await.counts()
    }

    /// Whether any record is still pending.
    pub async fn has_pending(&self) -> bool {
        self.ctx.store.read().await.has_pending()
    }

    /// Subscribe to store-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.ctx.bus.subscribe()
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Run one reconciliation tick now, then make sure the poll loop
    /// is running if anything is (still) pending.
    pub async fn refresh(&self) {
        poller::poll_once(&self.ctx).await;
        self.ensure_polling().await;
    }

    /// Spawn the poll loop if records are pending and no live loop
    /// exists. The loop exits on its own once the pending set drains.
    async fn ensure_polling(&self) {
        if !self.ctx.store.read().await.has_pending() {
            return;
        }
        let mut poller = self.poller.lock().await;
        let alive = poller.as_ref().is_some_and(|h| !h.is_finished());
        if !alive {
            *poller = Some(poller::spawn(Arc::clone(&self.ctx), self.poll_interval));
        }
    }

    /// Tear the service down: cancel the poll loop and wait for it.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.stop().await;
        }
        tracing::debug!(workspace_id = %self.ctx.workspace_id, "Queue service shut down");
    }

    // ---- private helpers ----

    async fn resolve_models(&self, model_ids: &[ModelId]) -> Result<Vec<ModelInfo>, QueueError> {
        let catalog = self.models.read().await;
        let mut targets = Vec::with_capacity(model_ids.len());
        for id in model_ids {
            let model = catalog
                .iter()
                .find(|m| &m.id == id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound {
                    entity: "Model",
                    id: id.clone(),
                })?;
            targets.push(model);
        }
        Ok(targets)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
