//! AWS-oriented adapters and handlers for record ingest.
//!
//! This crate owns runtime integration details (the Lambda handler, storage
//! adapters, and process configuration) on top of the pure contract in
//! `record_ingest_core`.

pub mod adapters;
pub mod handlers;
pub mod runtime;
