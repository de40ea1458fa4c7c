//! Level-triggered poll loop that reconciles server state into the
//! queue store.
//!
//! A single task owns the loop: it sleeps for the poll interval, runs
//! one tick to completion, then re-evaluates "is anything still
//! pending" on the post-merge state. Running ticks inside one owning
//! task serializes them; two ticks can never interleave their merges.
//! The task exits on its own once the pending set drains, and the
//! service respawns it when a new pending record appears.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use polymuse_client::RemoteApi;
use polymuse_core::types::WorkspaceId;
use polymuse_events::{EventBus, QueueEvent};

use crate::store::QueueStore;

/// Default delay between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shared state a poll tick operates on.
pub(crate) struct PollerContext {
    pub store: Arc<RwLock<QueueStore>>,
    pub remote: Arc<dyn RemoteApi>,
    pub bus: Arc<EventBus>,
    pub workspace_id: WorkspaceId,
}

/// Fetch the authoritative workspace list and merge it into the store.
///
/// Transport errors are non-fatal: they are logged and the tick simply
/// reports the current (pre-merge) pending state so the loop retries on
/// the next tick.
///
/// Returns whether any record is still pending after the merge.
pub(crate) async fn poll_once(ctx: &PollerContext) -> bool {
    let response = match ctx.remote.list_generations(&ctx.workspace_id).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                workspace_id = %ctx.workspace_id,
                error = %e,
                "Poll tick failed; will retry on next tick",
            );
            return ctx.store.read().await.has_pending();
        }
    };

    let mut store = ctx.store.write().await;
    let outcome = store.merge_snapshot(&response.generations);
    let counts_changed = store.set_counts(response.counts);
    let still_pending = store.has_pending();
    drop(store);

    if !outcome.updated.is_empty() {
        ctx.bus.publish(QueueEvent::Updated {
            ids: outcome.updated,
        });
    }
    if !outcome.inserted.is_empty() {
        ctx.bus.publish(QueueEvent::Inserted {
            ids: outcome.inserted,
        });
    }
    if counts_changed {
        let counts = ctx.store.read().await.counts();
        ctx.bus.publish(QueueEvent::CountsChanged {
            image: counts.image,
            video: counts.video,
            chat: counts.chat,
        });
    }

    still_pending
}

/// Handle to a running poll task.
pub(crate) struct PollHandle {
    task: JoinHandle<()>,
    cancel: CancellationToken,
}

impl PollHandle {
    /// Whether the task has exited (pending set drained or cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the loop and wait briefly for a clean exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.task).await;
    }
}

/// Spawn the poll loop.
///
/// The loop runs while records are pending and exits on its own once a
/// tick observes an empty pending set.
pub(crate) fn spawn(ctx: Arc<PollerContext>, interval: Duration) -> PollHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();

    let task = tokio::spawn(async move {
        ctx.bus.publish(QueueEvent::PollStarted);
        tracing::debug!(workspace_id = %ctx.workspace_id, "Poll loop started");

        loop {
            tokio::select! {
                _ = task_cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            // The tick runs to completion before the next sleep, so
            // ticks are serialized by construction.
            let still_pending = poll_once(&ctx).await;
            if !still_pending {
                break;
            }
        }

        ctx.bus.publish(QueueEvent::PollStopped);
        tracing::debug!(workspace_id = %ctx.workspace_id, "Poll loop stopped");
    });

    PollHandle { task, cancel }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
