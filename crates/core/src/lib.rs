//! Domain types and pure logic for the Polymuse client core.
//!
//! This crate has zero internal dependencies so it can be consumed by
//! the queue layer, the REST client, and any future CLI or desktop
//! front-end without dragging in networking or runtime concerns.

pub mod error;
pub mod filter;
pub mod generation;
pub mod model;
pub mod pricing;
pub mod request;
pub mod types;
