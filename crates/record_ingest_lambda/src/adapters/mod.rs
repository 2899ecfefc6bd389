pub mod dynamodb;
pub mod ids;
pub mod record_store;
