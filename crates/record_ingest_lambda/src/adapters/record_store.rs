use record_ingest_core::contract::Record;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to put item into table '{table}': {reason}")]
    PutItem { table: String, reason: String },
}

/// Single-item write keyed by the record id. Writing an existing id replaces it.
pub trait RecordStore {
    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError>;
}
