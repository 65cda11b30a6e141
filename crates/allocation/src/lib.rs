//! Allocation domain module.
//!
//! Assigns customer order lines to stock batches following a deterministic
//! preference policy: warehouse stock first, then the soonest incoming
//! shipment. Pure in-memory domain logic (no IO, no HTTP, no storage); loading
//! and saving batches is left to the caller.

pub mod batch;
pub mod order_line;
pub mod service;

pub use batch::{Batch, by_preference};
pub use order_line::OrderLine;
pub use service::{AllocationError, allocate};
