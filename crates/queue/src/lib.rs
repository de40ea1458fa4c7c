//! Generation queue: optimistic store, submission orchestration,
//! server-state reconciliation, and poll scheduling.
//!
//! The entry point is [`service::QueueService`], the imperative facade
//! a rendering layer calls. Everything underneath is split the same
//! way the logic divides: [`store`] owns the ordered record list and
//! its merge semantics, [`orchestrator`] turns one user request into
//! one-or-many remote submissions, [`estimator`] prices a request
//! before dispatch, and [`poller`] drives the level-triggered
//! reconciliation loop.

pub mod error;
pub mod estimator;
pub mod orchestrator;
pub mod poller;
pub mod service;
pub mod store;

pub use error::QueueError;
pub use orchestrator::SubmissionOutcome;
pub use service::QueueService;
pub use store::QueueStore;

#[cfg(test)]
mod testing;
