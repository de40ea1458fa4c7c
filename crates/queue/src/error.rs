use polymuse_client::ApiError;
use polymuse_core::error::CoreError;

/// Errors surfaced by the queue layer.
///
/// Background best-effort failures (poll ticks, quotes) never reach
/// this type; they are logged and retried or fall back locally.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// A domain validation error, surfaced synchronously before any
    /// network call.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A user-initiated remote call failed (delete, bulk delete).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Every target model's submission failed. Partial success is not
    /// an error; callers detect it from the outcome counts.
    #[error("All {count} model submissions failed")]
    AllSubmissionsFailed {
        count: usize,
        /// Per-model failure messages, in dispatch order.
        failures: Vec<(String, String)>,
    },
}
