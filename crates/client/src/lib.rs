//! REST client for the Polymuse platform API.
//!
//! Provides typed wire payloads, the [`reqwest`]-backed
//! [`api::PlatformApi`], and the [`remote::RemoteApi`] trait seam that
//! lets the queue layer run against an in-memory fake in tests.

pub mod api;
pub mod remote;
pub mod wire;

pub use api::{ApiError, PlatformApi};
pub use remote::RemoteApi;
