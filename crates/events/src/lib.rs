//! Store-change notifications for the Polymuse client core.
//!
//! A rendering layer subscribes to the [`bus::EventBus`] and re-renders
//! on mutation instead of polling the store itself.

pub mod bus;

pub use bus::{EventBus, QueueEvent};
