//! Shared record ingest domain primitives.
//!
//! This crate owns request body validation, the stored item layout, and the
//! response contract. It intentionally excludes AWS SDK and Lambda runtime
//! concerns.

pub mod contract;
pub mod item;
