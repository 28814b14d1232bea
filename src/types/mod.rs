//! Core types shared across the crate.
//!
//! - [`id`]: Identifier type for deferred values (`DeferredId`)
//! - [`outcome`]: Deferred state, settlement records and the `Payload` bound

pub mod id;
pub mod outcome;

pub use id::DeferredId;
pub use outcome::{DeferredState, Payload, Settlement};
